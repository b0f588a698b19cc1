use crate::replay::ReplayReport;
use cli_table::format::{Justify, Separator};
use cli_table::{Cell, CellStruct, Color, ColorChoice, Style, Table, TableStruct, print_stdout};
use drf::UserId;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum OutputMode {
    #[default]
    Cli,
    Json,
}

pub fn print_users(users: &[UserId], mode: OutputMode) -> crate::Result<()> {
    match mode {
        OutputMode::Cli => {
            let rows: Vec<Vec<CellStruct>> = users.iter().map(|u| vec![u.cell()]).collect();
            print_horizontal_table(rows, vec!["User".cell().bold(true)]);
        }
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(users)?),
    }
    Ok(())
}

pub fn print_report(report: &ReplayReport, mode: OutputMode) -> crate::Result<()> {
    match mode {
        OutputMode::Cli => print_report_tables(report),
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

fn print_report_tables(report: &ReplayReport) {
    let rows = report
        .cycles
        .iter()
        .map(|c| {
            let (user, app) = match &c.selection {
                Some(s) => (s.user.to_string(), s.application_id.to_string()),
                None => ("-".to_string(), "-".to_string()),
            };
            vec![
                c.cycle.cell().justify(Justify::Right),
                user.cell(),
                app.cell(),
                c.allocated
                    .as_ref()
                    .map(|r| r.to_string())
                    .unwrap_or_default()
                    .cell(),
                match &c.error {
                    Some(e) => e.as_str().cell().foreground_color(Some(Color::Red)),
                    None => "".cell(),
                },
            ]
        })
        .collect();
    print_horizontal_table(
        rows,
        vec![
            "Cycle".cell().bold(true),
            "User".cell().bold(true),
            "Application".cell().bold(true),
            "Allocated".cell().bold(true),
            "Error".cell().bold(true),
        ],
    );

    let rows = share_rows(report);
    print_horizontal_table(
        rows,
        vec![
            "User".cell().bold(true),
            "Dominant share".cell().bold(true),
            "Running".cell().bold(true),
            "Pending".cell().bold(true),
            "Completed".cell().bold(true),
            "Error".cell().bold(true),
        ],
    );

    let stats = &report.stats;
    print_table(
        vec![
            vec!["Partition".cell().bold(true), report.partition.as_str().cell()],
            vec!["Selections".cell().bold(true), stats.selections.cell()],
            vec![
                "Empty selections".cell().bold(true),
                stats.empty_selections.cell(),
            ],
            vec![
                "Stale entries discarded".cell().bold(true),
                stats.stale_discarded.cell(),
            ],
            vec![
                "Tombstones cleared".cell().bold(true),
                stats.tombstones_cleared.cell(),
            ],
            vec![
                "Unknown completions".cell().bold(true),
                stats.unknown_completions.cell(),
            ],
        ]
        .table(),
    );
}

fn share_rows(report: &ReplayReport) -> Vec<Vec<CellStruct>> {
    report
        .shares
        .iter()
        .map(|s| {
            vec![
                s.user.as_str().cell(),
                s.dominant_share
                    .map(|share| format!("{share:.4}"))
                    .unwrap_or_else(|| "-".to_string())
                    .cell()
                    .justify(Justify::Right),
                s.running.to_string().cell(),
                s.pending.cell().justify(Justify::Right),
                s.completed.cell().justify(Justify::Right),
                match &s.error {
                    Some(e) => e.as_str().cell().foreground_color(Some(Color::Red)),
                    None => "".cell(),
                },
            ]
        })
        .collect()
}

fn print_horizontal_table(rows: Vec<Vec<CellStruct>>, header: Vec<CellStruct>) {
    let table = rows
        .table()
        .separator(
            Separator::builder()
                .title(Some(Default::default()))
                .column(Some(Default::default()))
                .build(),
        )
        .title(header);
    print_table(table);
}

fn print_table(table: TableStruct) {
    let table = table.color_choice(ColorChoice::Auto);
    if let Err(e) = print_stdout(table) {
        log::error!("Cannot print table to stdout: {e:?}");
    }
}
