use piponger_client::ErrorDialog;
use piponger_view::{
    ActionGates, DashboardView, EndpointRow, Gate, MasterView, PingerView, PongerView,
    ProgressView, Row,
};

const BAR_WIDTH: usize = 20;
const BANNER: &str = "PIPONGER STATUS";

#[derive(Debug, Clone, Copy)]
pub struct UiOpts {
    pub ascii_only: bool,
    pub show_keys: bool,
}

/// Everything a single painted frame depends on.
pub struct Frame<'a> {
    pub server: &'a str,
    pub view: Option<&'a DashboardView>,
    pub gates: &'a ActionGates,
    pub dialog: Option<&'a ErrorDialog>,
    pub loading: bool,
    pub updated: Option<String>,
}

pub fn render_dashboard(frame: &Frame<'_>, opts: &UiOpts, term_w: u16) -> String {
    let width = term_w as usize;
    let mut lines = Vec::new();

    lines.push(center_line(BANNER, width));
    let mut status = format!("server: {}", frame.server);
    if let Some(view) = frame.view {
        if !view.roles.is_empty() {
            status.push_str(&format!("   roles: {}", view.roles.join(", ")));
        }
    }
    if let Some(updated) = &frame.updated {
        status.push_str(&format!("   updated: {updated}"));
    }
    if frame.loading {
        status.push_str("   refreshing...");
    }
    lines.push(status);
    lines.push(String::new());

    match frame.view {
        Some(view) if !view.is_empty() => {
            if let Some(master) = &view.master {
                render_master(&mut lines, master, frame.gates, opts);
            }
            if let Some(pinger) = &view.pinger {
                render_pinger(&mut lines, pinger, opts);
            }
            if let Some(ponger) = &view.ponger {
                render_ponger(&mut lines, ponger);
            }
        }
        Some(_) => lines.push("This node reports no master, pinger or ponger state.".to_string()),
        None => lines.push("No data yet".to_string()),
    }

    if opts.show_keys {
        lines.push(String::new());
        lines.push("[q] quit".to_string());
    }

    if let Some(dialog) = frame.dialog {
        lines.push(String::new());
        lines.extend(dialog_box(dialog, opts, width));
    }

    lines.join("\n")
}

fn render_master(lines: &mut Vec<String>, master: &MasterView, gates: &ActionGates, opts: &UiOpts) {
    lines.push("== MASTER ==".to_string());
    lines.extend(key_values(&master.rows));
    if let Some(progress) = &master.progress {
        lines.push(progress_line(progress, opts));
    }

    if let Some(hosts) = &master.problematic_hosts {
        lines.push(String::new());
        lines.push("Problematic hosts".to_string());
        let rows = hosts
            .iter()
            .map(|host| vec![host.host.clone(), host.score.clone()])
            .collect();
        lines.extend(table(&["Host", "Score"], rows));
    }

    lines.push(String::new());
    lines.push("Registered pingers".to_string());
    lines.extend(endpoint_table(&master.pingers));
    lines.push("Registered pongers".to_string());
    lines.extend(endpoint_table(&master.pongers));

    lines.push(String::new());
    lines.extend(action_bar(gates, opts));
    lines.push(String::new());
}

fn render_pinger(lines: &mut Vec<String>, pinger: &PingerView, opts: &UiOpts) {
    lines.push("== PINGER ==".to_string());
    if pinger.rows.is_empty() {
        lines.push("No iteration has run yet".to_string());
    }
    lines.extend(key_values(&pinger.rows));
    if let Some(progress) = &pinger.progress {
        lines.push(progress_line(progress, opts));
    }
    lines.push(String::new());
    lines.push("Pongers".to_string());
    lines.extend(endpoint_table(&pinger.pongers));
    lines.push(String::new());
}

fn render_ponger(lines: &mut Vec<String>, ponger: &PongerView) {
    lines.push("== PONGER ==".to_string());
    lines.push("Allocated pinger ports".to_string());
    let rows = ponger
        .ports
        .iter()
        .map(|port| vec![port.address.clone(), port.port.clone()])
        .collect();
    lines.extend(table(&["Address", "Port"], rows));
    lines.push(String::new());
}

fn key_values(rows: &[Row]) -> Vec<String> {
    let label_w = rows.iter().map(|row| row.label.len()).max().unwrap_or(0);
    rows.iter()
        .map(|row| format!("{:<label_w$}  {}", row.label, row.value))
        .collect()
}

pub fn progress_bar(progress: &ProgressView, opts: &UiOpts) -> String {
    let (full, empty) = if opts.ascii_only {
        ('#', '.')
    } else {
        ('\u{2588}', '\u{2591}')
    };
    let filled = usize::from(progress.percent) * BAR_WIDTH / 100;
    let bar: String = std::iter::repeat(full)
        .take(filled)
        .chain(std::iter::repeat(empty).take(BAR_WIDTH - filled))
        .collect();
    format!("[{bar}] {}", progress.value)
}

fn progress_line(progress: &ProgressView, opts: &UiOpts) -> String {
    format!("{}  {}", progress_bar(progress, opts), progress.caption)
}

fn endpoint_table(endpoints: &[EndpointRow]) -> Vec<String> {
    let rows = endpoints
        .iter()
        .map(|endpoint| {
            vec![
                endpoint.address.clone(),
                endpoint.api_port.clone(),
                endpoint.api_protocol.clone(),
            ]
        })
        .collect();
    table(&["Address", "API port", "API protocol"], rows)
}

fn table(headers: &[&str], rows: Vec<Vec<String>>) -> Vec<String> {
    if rows.is_empty() {
        return vec!["  (none)".to_string()];
    }

    let mut widths: Vec<usize> = headers.iter().map(|header| header.len()).collect();
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.len());
            }
        }
    }

    let format_row = |cells: Vec<&str>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        format!("  {}", padded.join("  ").trim_end())
    };

    let mut lines = vec![format_row(headers.to_vec())];
    for row in &rows {
        lines.push(format_row(row.iter().map(String::as_str).collect()));
    }
    lines
}

fn action_bar(gates: &ActionGates, opts: &UiOpts) -> Vec<String> {
    let actions: [(char, &str, &Gate); 3] = [
        ('s', "Start iteration", &gates.start),
        ('p', "Open result plot", &gates.plot),
        ('g', "Open interactive graph", &gates.graph),
    ];

    let mut buttons = Vec::new();
    let mut hints = Vec::new();
    for (key, label, gate) in actions {
        let button = if opts.show_keys {
            format!("[{key}] {label}")
        } else {
            label.to_string()
        };
        if gate.enabled {
            buttons.push(button);
        } else {
            buttons.push(format!("{button} (disabled)"));
            if let Some(hint) = gate.hint {
                hints.push(format!("  {label}: {hint}"));
            }
        }
    }

    let mut lines = vec![format!("Actions: {}", buttons.join("   "))];
    lines.extend(hints);
    lines
}

fn dialog_box(dialog: &ErrorDialog, opts: &UiOpts, width: usize) -> Vec<String> {
    let mut body = vec![dialog.title.clone(), dialog.message.clone()];
    if opts.show_keys {
        body.push("press Enter to dismiss".to_string());
    }
    let inner = body.iter().map(|line| line.len()).max().unwrap_or(0);
    let border = format!("+{}+", "-".repeat(inner + 2));

    let mut lines = vec![center_line(&border, width)];
    for line in body {
        lines.push(center_line(&format!("| {line:<inner$} |"), width));
    }
    lines.push(center_line(&border, width));
    lines
}

fn center_line(text: &str, width: usize) -> String {
    if text.len() >= width {
        return text.to_string();
    }
    let pad = (width - text.len()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}
