mod common;

use brd_dashboard::aggregate::{
    TOP_CLIENT_LIMIT, download_breakdown, summary_metrics, top_clients, trend_series, zero_filled,
};
use brd_dashboard::sheet::{RawTable, SUBMISSION_COLUMNS, load_submissions};
use common::{date, sample_submissions, submission};

fn ranking(rows: &[brd_dashboard::ClientDownloads]) -> Vec<(&str, u64)> {
    rows.iter()
        .map(|c| (c.client_name.as_str(), c.total_downloads))
        .collect()
}

#[test]
fn test_worked_example() {
    let filtered = vec![
        submission("Acme", "2024-02-01 10:00:00", "1", "alice", (1, 0, 0)),
        submission("Acme", "2024-02-01 11:00:00", "2", "alice", (0, 2, 0)),
        submission("Globex", "2024-02-02 09:00:00", "1", "bob", (0, 0, 3)),
    ];

    let metrics = summary_metrics(&filtered);
    assert_eq!(metrics.total_count, 3);
    assert_eq!(metrics.unique_clients, 2);
    assert_eq!(metrics.total_downloads, 6);
    assert_eq!(metrics.avg_downloads_per_record, 2.0);

    let top = top_clients(&filtered, TOP_CLIENT_LIMIT);
    assert_eq!(ranking(&top), vec![("Acme", 3), ("Globex", 3)]);
}

#[test]
fn test_summary_metrics_round_average() {
    let metrics = summary_metrics(&sample_submissions());
    assert_eq!(metrics.total_count, 7);
    assert_eq!(metrics.unique_clients, 6);
    assert_eq!(metrics.total_downloads, 17);
    // 17 / 7 = 2.428...
    assert_eq!(metrics.avg_downloads_per_record, 2.43);
}

#[test]
fn test_empty_input_is_zero_everywhere() {
    let metrics = summary_metrics(&[]);
    assert_eq!(metrics.total_count, 0);
    assert_eq!(metrics.unique_clients, 0);
    assert_eq!(metrics.total_downloads, 0);
    assert_eq!(metrics.avg_downloads_per_record, 0.0);

    assert!(trend_series(&[]).is_empty());
    assert!(zero_filled(&[]).is_empty());
    assert_eq!(download_breakdown(&[]).total(), 0);
    assert!(top_clients(&[], TOP_CLIENT_LIMIT).is_empty());
}

#[test]
fn test_breakdown_matches_total_downloads() {
    let submissions = sample_submissions();
    let breakdown = download_breakdown(&submissions);

    assert_eq!((breakdown.md, breakdown.pdf, breakdown.docx), (7, 5, 5));
    assert_eq!(
        breakdown.total(),
        summary_metrics(&submissions).total_downloads
    );
    assert_eq!(
        breakdown.slices(),
        [("Markdown", 7), ("PDF", 5), ("DOCX", 5)]
    );

    // holds for every prefix too
    for n in 0..=submissions.len() {
        let subset = &submissions[..n];
        assert_eq!(
            download_breakdown(subset).total(),
            summary_metrics(subset).total_downloads
        );
    }
}

#[test]
fn test_trend_groups_by_calendar_date() {
    let trend = trend_series(&sample_submissions());
    let points: Vec<_> = trend.iter().map(|p| (p.date, p.count)).collect();

    assert_eq!(
        points,
        vec![
            (date("2024-01-05"), 2),
            (date("2024-01-07"), 1),
            (date("2024-01-09"), 1),
            (date("2024-01-10"), 2),
            (date("2024-01-12"), 1),
        ]
    );
}

#[test]
fn test_trend_is_sorted_even_for_unsorted_input() {
    let mut submissions = sample_submissions();
    submissions.reverse();

    let trend = trend_series(&submissions);
    assert!(trend.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(trend.iter().map(|p| p.count).sum::<usize>(), submissions.len());
}

#[test]
fn test_zero_filled_trend_has_no_gaps() {
    let filled = zero_filled(&trend_series(&sample_submissions()));

    assert_eq!(filled.len(), 8, "2024-01-05 through 2024-01-12");
    assert_eq!(filled[0].date, date("2024-01-05"));
    assert_eq!(filled[1].date, date("2024-01-06"));
    assert_eq!(filled[1].count, 0);
    assert_eq!(filled[7].date, date("2024-01-12"));
    assert_eq!(filled.iter().map(|p| p.count).sum::<usize>(), 7);
}

#[test]
fn test_top_clients_ranking() {
    let top = top_clients(&sample_submissions(), TOP_CLIENT_LIMIT);

    // Acme and Globex tie on 3; Acme was seen first
    assert_eq!(
        ranking(&top),
        vec![
            ("Initech", 6),
            ("Hooli", 4),
            ("Acme", 3),
            ("Globex", 3),
            ("Umbrella", 1),
        ]
    );
}

#[test]
fn test_top_clients_length_is_min_of_limit_and_clients() {
    let submissions = sample_submissions();
    let unique = summary_metrics(&submissions).unique_clients;

    for limit in 0..8 {
        let top = top_clients(&submissions, limit);
        assert_eq!(top.len(), limit.min(unique));
        assert!(
            top.windows(2)
                .all(|w| w[0].total_downloads >= w[1].total_downloads)
        );
    }
}

#[test]
fn test_top_clients_ties_follow_encounter_order() {
    let filtered = vec![
        submission("Zeta", "2024-01-01 00:00:00", "1", "a", (1, 0, 0)),
        submission("Alpha", "2024-01-01 00:00:00", "1", "a", (0, 1, 0)),
        submission("Mid", "2024-01-01 00:00:00", "1", "a", (0, 0, 1)),
    ];

    let top = top_clients(&filtered, TOP_CLIENT_LIMIT);
    assert_eq!(ranking(&top), vec![("Zeta", 1), ("Alpha", 1), ("Mid", 1)]);
}

#[test]
fn test_huge_counters_saturate_instead_of_overflowing() {
    let mut table = RawTable::new(&SUBMISSION_COLUMNS);
    table.push_row(&[
        "2024-01-05 09:15:00",
        "Acme",
        "1",
        "alice",
        "18446744073709551615",
        "1",
        "",
    ]);
    table.push_row(&["2024-01-06 09:15:00", "Acme", "2", "bob", "5", "", ""]);
    let filtered = load_submissions(&table, "Sheet1").unwrap();

    assert_eq!(filtered[0].total_downloads(), u64::MAX);

    let metrics = summary_metrics(&filtered);
    assert_eq!(metrics.total_downloads, u64::MAX);

    let breakdown = download_breakdown(&filtered);
    assert_eq!(breakdown.md, u64::MAX);
    assert_eq!(breakdown.pdf, 1);
    assert_eq!(breakdown.total(), u64::MAX);

    assert_eq!(ranking(&top_clients(&filtered, TOP_CLIENT_LIMIT)), vec![("Acme", u64::MAX)]);
}
