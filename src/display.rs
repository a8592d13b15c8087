use comfy_table::{Attribute, Cell, ContentArrangement, Table};

use crate::models::{CheckResult, ProfileHistory};

const BANNER: &str = "==================================================";

/// Render one check result as a printable block. Pure formatting, no I/O.
pub fn format_result(result: &CheckResult) -> String {
    let mut out: Vec<String> = Vec::new();
    out.push(BANNER.to_string());

    if result.success {
        let default = ProfileHistory::default();
        let data = result.data.as_ref().unwrap_or(&default);
        let name = if data.current_username.is_empty() {
            "unknown"
        } else {
            data.current_username.as_str()
        };

        out.push(format!("Username: @{}", name));
        out.push(format!(
            "Status: {}",
            if data.is_clean {
                "CLEAN ✅"
            } else {
                "CHANGES DETECTED ⚠️"
            }
        ));

        if data.total_changes > 0 {
            out.push(format!("Total Changes: {}", data.total_changes));
            out.push("\nPrevious Usernames:".to_string());
            for item in &data.history {
                out.push(format!("  • {}", item));
            }
        }

        if !data.insights.is_empty() {
            out.push("\nInsights:".to_string());
            for insight in &data.insights {
                out.push(format!("  {}", insight));
            }
        }
    } else {
        out.push(format!(
            "Error: {}",
            result.error.as_deref().unwrap_or("Unknown error")
        ));
        if let Some(message) = &result.message {
            out.push(format!("Message: {}", message));
        }
    }

    out.push(BANNER.to_string());
    out.join("\n")
}

/// One row per result, for terminal display after a batch run.
pub fn render_results_table(results: &[CheckResult]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Username").add_attribute(Attribute::Bold),
        Cell::new("Status").add_attribute(Attribute::Bold),
        Cell::new("Changes").add_attribute(Attribute::Bold),
        Cell::new("Error").add_attribute(Attribute::Bold),
    ]);

    for result in results {
        let username = result
            .username
            .as_deref()
            .or(result.data.as_ref().map(|d| d.current_username.as_str()))
            .unwrap_or("unknown");
        let (status, changes) = match &result.data {
            Some(data) if result.success && data.is_clean => ("clean", data.total_changes.to_string()),
            Some(data) if result.success => ("changed", data.total_changes.to_string()),
            _ if result.success => ("changed", String::new()),
            _ => ("error", String::new()),
        };

        table.add_row(vec![
            format!("@{}", username),
            status.to_string(),
            changes,
            result.error.clone().unwrap_or_default(),
        ]);
    }

    table
}

/// Totals for the end of a batch run.
pub fn batch_summary(results: &[CheckResult]) -> String {
    let clean = results
        .iter()
        .filter(|r| r.success && r.data.as_ref().is_some_and(|d| d.is_clean))
        .count();
    let changed = results
        .iter()
        .filter(|r| r.success && !r.data.as_ref().is_some_and(|d| d.is_clean))
        .count();
    let errors = results.iter().filter(|r| !r.success).count();

    format!(
        "{}\nBatch Check Summary\n{}\nTotal checked: {}\nClean accounts: {}\nChanged accounts: {}\nErrors: {}",
        BANNER,
        BANNER,
        results.len(),
        clean,
        changed,
        errors
    )
}
