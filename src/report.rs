//! Static HTML dashboard renderer.
//!
//! Renders the full retained history plus the current run into one
//! self-contained page: summary stat boxes, the current run's table
//! (success-first), and a newest-first timeline where each row opens a
//! client-side modal with that run's detail table (failures-first).
//! The history is embedded as an inline JSON array so the drill-down
//! needs no server round-trip — the file works from disk.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::classifier::CheckResult;
use crate::history::HistoryEntry;

const STYLE: &str = r#"
        :root { --bg: #09090b; --card-bg: #18181b; --border: #27272a; --text: #e4e4e7; --text-muted: #a1a1aa; --primary: #3b82f6; --success: #4ade80; --error: #f87171; --warning: #f59e0b; }
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: var(--bg); color: var(--text); padding: 40px; max-width: 1000px; margin: 0 auto; line-height: 1.5; }
        h1, h2, h3 { color: #fff; margin-bottom: 20px; }
        h1 { text-align: center; margin-bottom: 5px; }
        .meta { text-align: center; color: var(--text-muted); font-size: 0.9em; margin-bottom: 40px; letter-spacing: 0.5px; }

        .stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin-bottom: 40px; }
        .stat-box { background: var(--card-bg); padding: 20px; border-radius: 12px; border: 1px solid var(--border); text-align: center; transition: all 0.2s; }
        .stat-box:hover { transform: translateY(-2px); border-color: var(--primary); box-shadow: 0 4px 20px rgba(0,0,0,0.5); }
        .stat-value { font-size: 28px; font-weight: bold; color: #fff; margin-bottom: 4px; }
        .stat-label { font-size: 12px; color: var(--text-muted); text-transform: uppercase; letter-spacing: 1px; }

        .section-header { display: flex; align-items: center; justify-content: space-between; margin-top: 40px; margin-bottom: 20px; border-bottom: 1px solid var(--border); padding-bottom: 10px; }

        table { border-collapse: separate; border-spacing: 0; width: 100%; border: 1px solid var(--border); border-radius: 12px; overflow: hidden; background: var(--card-bg); margin-bottom: 30px; }
        th, td { padding: 14px 20px; text-align: left; border-bottom: 1px solid var(--border); }
        th { background: #27272a; color: #fff; font-weight: 600; font-size: 13px; text-transform: uppercase; letter-spacing: 0.5px; }
        tr:last-child td { border-bottom: none; }
        tr:hover td { background: #222226; }

        .status-badge { display: inline-flex; align-items: center; padding: 4px 10px; border-radius: 20px; font-size: 11px; font-weight: 600; text-transform: uppercase; }
        .status-success { background: rgba(34, 197, 94, 0.1); color: var(--success); border: 1px solid rgba(34, 197, 94, 0.2); }
        .status-fail { background: rgba(239, 68, 68, 0.1); color: var(--error); border: 1px solid rgba(239, 68, 68, 0.2); }

        .model-name { font-family: 'Monaco', 'Consolas', monospace; color: var(--text); font-size: 13px; }
        .timestamp { color: var(--text-muted); font-family: monospace; font-size: 12px; }

        .history-grid { display: grid; gap: 10px; }
        .history-row { display: flex; align-items: center; background: var(--card-bg); padding: 12px 20px; border-radius: 8px; border: 1px solid var(--border); justify-content: space-between; cursor: pointer; transition: all 0.2s; position: relative; overflow: hidden; }
        .history-row:hover { border-color: var(--primary); background: #1f1f23; padding-left: 25px; }
        .history-row::before { content: '\2192'; position: absolute; left: 8px; opacity: 0; color: var(--primary); transition: all 0.2s; }
        .history-row:hover::before { opacity: 1; }

        .history-stats { display: flex; gap: 20px; font-size: 13px; align-items: center; }
        .uptime-bar-container { height: 4px; background: var(--border); border-radius: 2px; width: 100px; margin-left: 10px; overflow: hidden; }
        .uptime-bar { height: 100%; background: var(--success); transition: width 0.5s ease-out; }

        /* Modal / Details Styles */
        #detailsOverlay { position: fixed; top: 0; left: 0; right: 0; bottom: 0; background: rgba(0,0,0,0.85); backdrop-filter: blur(8px); display: none; z-index: 100; padding: 40px; overflow-y: auto; }
        .modal-content { background: var(--bg); border: 1px solid var(--border); border-radius: 16px; width: 100%; max-width: 800px; margin: 0 auto; padding: 30px; position: relative; box-shadow: 0 20px 50px rgba(0,0,0,0.5); }
        .close-btn { position: absolute; top: 20px; right: 20px; background: var(--border); color: #fff; border: none; padding: 8px 15px; border-radius: 8px; cursor: pointer; font-weight: bold; }
        .close-btn:hover { background: #3f3f46; }

        @media (max-width: 600px) {
            body { padding: 20px; }
            .stats { grid-template-columns: 1fr 1fr; }
            .history-stats { flex-direction: column; gap: 5px; align-items: flex-end; }
            #detailsOverlay { padding: 10px; }
        }
"#;

/// Client-side drill-down. `__HISTORY_DATA__` is replaced with the
/// embedded history JSON at render time.
const SCRIPT: &str = r#"
            const historyData = __HISTORY_DATA__;
            const overlay = document.getElementById('detailsOverlay');
            const title = document.getElementById('modalTitle');
            const meta = document.getElementById('modalMeta');
            const container = document.getElementById('modalTableContainer');

            function formatDate(isoStr) {
                const d = new Date(isoStr);
                return d.toLocaleString();
            }

            function viewDetails(index) {
                const run = historyData[index];
                if (!run) return;

                title.innerText = "Run Details: " + formatDate(run.timestamp);
                meta.innerText = `Operational: ${run.success} / ${run.total} Models`;

                let html = `<table>
                    <thead>
                        <tr>
                            <th width="120">Status</th>
                            <th>Model</th>
                            <th>Message</th>
                        </tr>
                    </thead>
                    <tbody>`;

                // Sort details: failures first to highlight issues
                const sortedDetails = [...run.details].sort((a,b) => (a.success === b.success) ? 0 : a.success ? 1 : -1);

                sortedDetails.forEach(d => {
                    const statusClass = d.success ? 'status-success' : 'status-fail';
                    const statusText = d.success ? 'Operational' : 'Error';
                    const msgColor = d.success ? 'var(--success)' : 'var(--error)';
                    html += `<tr>
                        <td><span class="status-badge ${statusClass}">${statusText}</span></td>
                        <td class="model-name">${d.model}</td>
                        <td style="color: ${msgColor}">${d.status}</td>
                    </tr>`;
                });

                html += '</tbody></table>';
                container.innerHTML = html;
                overlay.style.display = 'block';
                document.body.style.overflow = 'hidden';
            }

            function closeDetails() {
                overlay.style.display = 'none';
                document.body.style.overflow = 'auto';
            }

            window.addEventListener('keydown', (e) => { if(e.key === 'Escape') closeDetails(); });
            overlay.addEventListener('click', (e) => { if(e.target === overlay) closeDetails(); });
"#;

/// Render a history timestamp like `Jan 05, 14:30:02`, falling back
/// to the raw string when it does not parse.
fn display_timestamp(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.format("%b %d, %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Render the full dashboard to an HTML string.
///
/// Pure with respect to its inputs: identical history, results and
/// timestamp produce byte-identical output.
pub fn render_dashboard(
    history: &[HistoryEntry],
    latest_results: &[CheckResult],
    generated_at: DateTime<Local>,
) -> Result<String> {
    // Display copy, newest first. Storage stays oldest-first.
    let mut history: Vec<HistoryEntry> = history.to_vec();
    history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let total_runs = history.len();
    let total_checks: usize = history.iter().map(|h| h.total).sum();
    let total_successes: usize = history.iter().map(|h| h.success).sum();
    let avg_uptime = if total_checks > 0 {
        total_successes as f64 / total_checks as f64 * 100.0
    } else {
        0.0
    };

    let history_json = serde_json::to_string(&history)
        .context("Failed to embed history in report")?;

    let date_str = generated_at.format("%Y-%m-%d %H:%M:%S").to_string();
    let time_str = generated_at.format("%H:%M:%S").to_string();

    let mut page = String::with_capacity(32 * 1024);
    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    page.push_str("<meta charset='utf-8'>\n");
    page.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    page.push_str("<title>Gemini Rate Dashboard</title>\n<style>");
    page.push_str(STYLE);
    page.push_str("</style>\n</head>\n<body>\n");

    page.push_str("    <h1>Gemini Rate Dashboard</h1>\n");
    page.push_str(&format!(
        "    <div class=\"meta\">System Health Overview &bull; Last Update: {}</div>\n",
        date_str
    ));

    // Summary panel
    page.push_str("    <div class=\"stats\">\n");
    page.push_str(&format!(
        "        <div class=\"stat-box\"><div class=\"stat-value\" style=\"color: var(--primary)\">{}</div><div class=\"stat-label\">Total Runs</div></div>\n",
        total_runs
    ));
    page.push_str(&format!(
        "        <div class=\"stat-box\"><div class=\"stat-value\" style=\"color: var(--success)\">{:.1}%</div><div class=\"stat-label\">Global Success Rate</div></div>\n",
        avg_uptime
    ));
    page.push_str(&format!(
        "        <div class=\"stat-box\"><div class=\"stat-value\" style=\"color: var(--warning)\">{}</div><div class=\"stat-label\">Total Requests</div></div>\n",
        total_checks
    ));
    page.push_str(&format!(
        "        <div class=\"stat-box\"><div class=\"stat-value\">{}</div><div class=\"stat-label\">Models Monitored</div></div>\n",
        latest_results.len()
    ));
    page.push_str("    </div>\n");

    // Current run, success first
    page.push_str("    <div class=\"section-header\">\n        <h2>Latest Deployment Results</h2>\n");
    page.push_str(&format!(
        "        <div class=\"timestamp\">Last Checked: {}</div>\n    </div>\n",
        time_str
    ));
    page.push_str("    <table>\n        <thead>\n            <tr>\n                <th width=\"120\">Status</th>\n                <th>Model Endpoint</th>\n                <th>Signal Message</th>\n            </tr>\n        </thead>\n        <tbody>\n");

    let mut sorted_latest: Vec<&CheckResult> = latest_results.iter().collect();
    sorted_latest.sort_by_key(|r| !r.success);
    for result in sorted_latest {
        let (status_class, status_text, msg_color) = if result.success {
            ("status-success", "Operational", "var(--success)")
        } else {
            ("status-fail", "Error", "var(--error)")
        };
        page.push_str(&format!(
            "            <tr>\n                <td><span class=\"status-badge {}\">{}</span></td>\n                <td class=\"model-name\">{}</td>\n                <td style=\"color: {}\">{}</td>\n            </tr>\n",
            status_class, status_text, result.model, msg_color, result.status
        ));
    }
    page.push_str("        </tbody>\n    </table>\n");

    // Timeline, newest first, each row opens the drill-down modal
    page.push_str("    <div class=\"section-header\">\n        <h2>Historical Timeline</h2>\n        <div class=\"timestamp\">Click any row to see full results</div>\n    </div>\n");
    page.push_str("    <div class=\"history-grid\">\n");

    for (idx, entry) in history.iter().enumerate() {
        let ts = display_timestamp(&entry.timestamp);
        let success_pct = if entry.total > 0 {
            entry.success as f64 / entry.total as f64 * 100.0
        } else {
            0.0
        };
        let row_color = if success_pct > 90.0 {
            "var(--success)"
        } else if success_pct > 50.0 {
            "var(--warning)"
        } else {
            "var(--error)"
        };

        page.push_str(&format!(
            concat!(
                "        <div class=\"history-row\" onclick=\"viewDetails({idx})\">\n",
                "            <div class=\"timestamp\">{ts}</div>\n",
                "            <div class=\"history-stats\">\n",
                "                <span style=\"color: var(--text-muted)\">Models: <b>{total}</b></span>\n",
                "                <span style=\"color: {color}\">Success: <b>{success}</b></span>\n",
                "                <div style=\"display: flex; align-items: center;\">\n",
                "                    <span style=\"color: {color}; font-weight: bold; min-width: 45px; text-align: right;\">{pct:.0}%</span>\n",
                "                    <div class=\"uptime-bar-container\"><div class=\"uptime-bar\" style=\"width: {pct:.0}%; background: {color}\"></div></div>\n",
                "                </div>\n",
                "            </div>\n",
                "        </div>\n",
            ),
            idx = idx,
            ts = ts,
            total = entry.total,
            success = entry.success,
            pct = success_pct,
            color = row_color,
        ));
    }
    page.push_str("    </div>\n");

    // Drill-down modal shell
    page.push_str(
        "    <div id=\"detailsOverlay\">\n        <div class=\"modal-content\">\n            <button class=\"close-btn\" onclick=\"closeDetails()\">ESC / Close</button>\n            <h2 id=\"modalTitle\">Run Details</h2>\n            <div id=\"modalMeta\" class=\"meta\" style=\"text-align: left; margin-bottom: 20px;\"></div>\n            <div id=\"modalTableContainer\"></div>\n        </div>\n    </div>\n",
    );

    page.push_str("    <div style=\"text-align: center; margin-top: 40px; color: #52525b; font-size: 12px; border-top: 1px solid var(--border); padding-top: 20px;\">&copy; 2026 Gemini Intelligence Monitoring Unit</div>\n");

    page.push_str("    <script>");
    page.push_str(&SCRIPT.replace("__HISTORY_DATA__", &history_json));
    page.push_str("    </script>\n</body>\n</html>\n");

    Ok(page)
}

/// Render the dashboard and write it to `path`.
pub fn write_report(
    path: &Path,
    history: &[HistoryEntry],
    latest_results: &[CheckResult],
    generated_at: DateTime<Local>,
) -> Result<()> {
    let html = render_dashboard(history, latest_results, generated_at)?;
    fs::write(path, html)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!(path = %path.display(), "Interactive history dashboard generated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::RunDetail;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 1, 5, 14, 30, 2).unwrap()
    }

    fn sample_history() -> Vec<HistoryEntry> {
        vec![
            HistoryEntry {
                timestamp: "2026-01-04T10:00:00.000000".into(),
                total: 2,
                success: 1,
                details: vec![
                    RunDetail {
                        model: "models/gemini-2.5-flash".into(),
                        status: "OK".into(),
                        success: true,
                    },
                    RunDetail {
                        model: "models/gemini-2.0-flash".into(),
                        status: "Rate Limit (429)".into(),
                        success: false,
                    },
                ],
            },
            HistoryEntry {
                timestamp: "2026-01-05T10:00:00.000000".into(),
                total: 1,
                success: 1,
                details: vec![RunDetail {
                    model: "models/gemini-2.5-flash".into(),
                    status: "OK".into(),
                    success: true,
                }],
            },
        ]
    }

    fn sample_results() -> Vec<CheckResult> {
        vec![
            CheckResult::new(false, "models/gemini-2.0-flash", "Error 503"),
            CheckResult::new(true, "models/gemini-2.5-flash", "OK"),
        ]
    }

    #[test]
    fn test_render_is_deterministic() {
        let history = sample_history();
        let results = sample_results();
        let a = render_dashboard(&history, &results, fixed_now()).unwrap();
        let b = render_dashboard(&history, &results, fixed_now()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_embeds_history_newest_first() {
        let html = render_dashboard(&sample_history(), &sample_results(), fixed_now()).unwrap();

        let newer = html.find("2026-01-05T10:00:00").expect("newer run embedded");
        let older = html.find("2026-01-04T10:00:00").expect("older run embedded");
        assert!(newer < older, "display order is newest first");
    }

    #[test]
    fn test_current_run_table_sorts_success_first() {
        let html = render_dashboard(&[], &sample_results(), fixed_now()).unwrap();

        let ok_row = html.find("models/gemini-2.5-flash").unwrap();
        let failed_row = html.find("models/gemini-2.0-flash").unwrap();
        assert!(ok_row < failed_row);
    }

    #[test]
    fn test_summary_stats() {
        let html = render_dashboard(&sample_history(), &sample_results(), fixed_now()).unwrap();

        // 2 successes out of 3 checks across 2 runs.
        assert!(html.contains("66.7%"));
        assert!(html.contains("Total Runs"));
        assert!(html.contains("Last Update: 2026-01-05 14:30:02"));
    }

    #[test]
    fn test_empty_history_renders_without_division_by_zero() {
        let html = render_dashboard(&[], &[], fixed_now()).unwrap();
        assert!(html.contains("0.0%"));
    }

    #[test]
    fn test_unparseable_timestamp_falls_back_to_raw() {
        assert_eq!(display_timestamp("not-a-date"), "not-a-date");
        assert_eq!(
            display_timestamp("2026-01-05T14:30:02.123456"),
            "Jan 05, 14:30:02"
        );
    }

    #[test]
    fn test_report_is_self_contained() {
        let html = render_dashboard(&sample_history(), &sample_results(), fixed_now()).unwrap();
        assert!(!html.contains("http://"), "no external assets");
        assert!(!html.contains("https://"), "no external assets");
        assert!(html.contains("const historyData = ["));
    }
}
