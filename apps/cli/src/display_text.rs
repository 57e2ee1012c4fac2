use std::fmt::Write;

use grantdeck_application::{DisplayModel, PermissionListView, StateIcon};

/// Renders a display model as plain terminal text.
pub fn render_text(model: &DisplayModel) -> String {
    let mut out = String::new();

    if let Some(header) = &model.header {
        let _ = writeln!(
            out,
            "{} ({}) <{}> [{}]",
            header.display_name, header.username, header.email, header.status.label
        );
        out.push('\n');
    }

    match &model.body {
        PermissionListView::Loading { message } => {
            let _ = writeln!(out, "{message}");
        }
        PermissionListView::Failed {
            icon,
            title,
            message,
        } => {
            let _ = writeln!(out, "{} {title}: {message}", icon_marker(*icon));
        }
        PermissionListView::Empty { icon, message } => {
            let _ = writeln!(out, "{} {message}", icon_marker(*icon));
        }
        PermissionListView::Modules { stats, cards } => {
            let strip: Vec<String> = stats
                .iter()
                .map(|stat| format!("{} {} {}", stat.title, stat.counter, stat.label))
                .collect();
            let _ = writeln!(out, "{}", strip.join(" | "));

            for card in cards {
                let _ = writeln!(out, "\n{} ({})", card.title, card.counter);
                for row in &card.rows {
                    let mark = if row.checked { "x" } else { " " };
                    let _ = writeln!(
                        out,
                        "  [{mark}] {:<24} {} ({})",
                        row.secondary_label, row.label, row.badge.label
                    );
                }
            }
        }
    }

    out
}

fn icon_marker(icon: StateIcon) -> &'static str {
    match icon {
        StateIcon::Warning => "!",
        StateIcon::Info => "i",
    }
}
