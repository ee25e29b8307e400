//! Annotator integration tests, driven by an in-process analytics fake.

mod common;

use comment_annotator::annotate::*;
use comment_annotator::models::*;
use comment_annotator::store::{Cell, Table};

use common::*;

fn comments(values: &[&str]) -> Table {
    Table::from_column(COMMENT_COLUMN, values.iter().map(|v| Cell::from(*v)).collect())
}

fn texts(table: &Table, column: &str) -> Vec<String> {
    table
        .column(column)
        .expect("Missing column")
        .map(Cell::to_text)
        .collect()
}

fn numbers(table: &Table, column: &str) -> Vec<f64> {
    table
        .column(column)
        .expect("Missing column")
        .map(|c| c.as_number().expect("Not a number"))
        .collect()
}

mod preconditions {
    use super::*;

    #[tokio::test]
    async fn fails_without_a_table() {
        let fake = FakeAnalytics::per_text();
        let annotator = Annotator::new(Box::new(fake.clone()));

        let result = annotator.run(None).await;

        assert!(matches!(result, Err(AnnotateError::NoDataLoaded)));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn fails_without_comment_column_and_leaves_table_alone() {
        let fake = FakeAnalytics::per_text();
        let annotator = Annotator::new(Box::new(fake.clone()));
        let mut table = Table::from_column("review", vec![Cell::from("Great game!")]);
        let before = table.clone();

        let result = annotator.run(Some(&mut table)).await;

        match result {
            Err(AnnotateError::MissingCommentColumn(column)) => assert_eq!(column, "comment"),
            other => panic!("Expected MissingCommentColumn, got {:?}", other),
        }
        assert_eq!(table, before);
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn honours_a_custom_comment_column() {
        let annotator =
            Annotator::with_comment_column(Box::new(FakeAnalytics::per_text()), "comentario");
        let mut table = Table::from_column("comentario", vec![Cell::from("Great game!")]);

        annotator.run(Some(&mut table)).await.expect("Analysis failed");

        assert_eq!(texts(&table, SENTIMENT_COLUMN), vec!["Positivo"]);
    }
}

mod results {
    use super::*;

    #[tokio::test]
    async fn maps_sentiment_affinity_and_tags() {
        let fake = FakeAnalytics::canned(
            vec![positive(0.97), negative(0.05)],
            vec![phrases(&["game"]), phrases(&["bugs"])],
        );
        let annotator = Annotator::new(Box::new(fake));
        let mut table = comments(&["Great game!", "Terrible bugs"]);

        let report = annotator.run(Some(&mut table)).await.expect("Analysis failed");

        assert_eq!(texts(&table, SENTIMENT_COLUMN), vec!["Positivo", "Negativo"]);
        assert_eq!(numbers(&table, AFFINITY_COLUMN), vec![97.0, 5.0]);
        assert_eq!(texts(&table, TAGS_COLUMN), vec!["game", "bugs"]);
        assert_eq!(report.rows, 2);
        assert_eq!(report.positive, 1);
        assert_eq!(report.negative, 1);
    }

    #[tokio::test]
    async fn downgrades_a_failed_item_to_placeholders() {
        let fake = FakeAnalytics::canned(
            vec![Err(item_error()), positive(0.8)],
            vec![phrases(&["servers", "lag"]), phrases(&[])],
        );
        let annotator = Annotator::new(Box::new(fake));
        let mut table = comments(&["", "Great story"]);

        let report = annotator.run(Some(&mut table)).await.expect("Analysis failed");

        assert_eq!(texts(&table, SENTIMENT_COLUMN), vec!["Error", "Positivo"]);
        assert_eq!(numbers(&table, AFFINITY_COLUMN), vec![0.0, 80.0]);
        assert_eq!(texts(&table, TAGS_COLUMN), vec!["servers, lag", ""]);
        assert_eq!(report.sentiment_errors, 1);
        assert_eq!(report.key_phrase_errors, 0);
    }

    #[tokio::test]
    async fn failed_key_phrases_leave_tags_empty() {
        let fake = FakeAnalytics::canned(vec![negative(0.3)], vec![Err(item_error())]);
        let annotator = Annotator::new(Box::new(fake));
        let mut table = comments(&["Crashes on launch"]);

        let report = annotator.run(Some(&mut table)).await.expect("Analysis failed");

        assert_eq!(texts(&table, SENTIMENT_COLUMN), vec!["Negativo"]);
        assert_eq!(texts(&table, TAGS_COLUMN), vec![""]);
        assert_eq!(report.key_phrase_errors, 1);
    }

    #[tokio::test]
    async fn produces_one_value_per_row_in_order() {
        let fake = FakeAnalytics::per_text();
        let annotator = Annotator::new(Box::new(fake));
        let values: Vec<String> = (0..25)
            .map(|i| if i % 3 == 0 { format!("great {}", i) } else { format!("meh {}", i) })
            .collect();
        let mut table = Table::from_column(
            COMMENT_COLUMN,
            values.iter().map(|v| Cell::from(v.as_str())).collect(),
        );

        annotator.run(Some(&mut table)).await.expect("Analysis failed");

        let labels = texts(&table, SENTIMENT_COLUMN);
        let tags = texts(&table, TAGS_COLUMN);
        assert_eq!(labels.len(), 25);
        assert_eq!(tags.len(), 25);
        for (i, (label, tag)) in labels.iter().zip(&tags).enumerate() {
            let expected = if i % 3 == 0 { "Positivo" } else { "Negativo" };
            assert_eq!(label, expected);
            assert_eq!(tag, if i % 3 == 0 { "great" } else { "meh" });
        }
    }

    #[tokio::test]
    async fn sends_non_text_values_as_text() {
        let fake = FakeAnalytics::per_text();
        let annotator = Annotator::new(Box::new(fake.clone()));
        let mut table = Table::from_column(
            COMMENT_COLUMN,
            vec![Cell::Number(10.0), Cell::Empty, Cell::Bool(true), Cell::from("ok")],
        );

        annotator.run(Some(&mut table)).await.expect("Analysis failed");

        let calls = fake.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], vec!["10", "", "true", "ok"]);
        assert_eq!(calls[0], calls[1]);
    }

    #[tokio::test]
    async fn running_twice_overwrites_derived_columns() {
        let annotator = Annotator::new(Box::new(FakeAnalytics::per_text()));
        let mut table = Table::new(
            vec!["id".to_string(), COMMENT_COLUMN.to_string()],
            vec![
                vec![Cell::Number(1.0), Cell::from("Great game!")],
                vec![Cell::Number(2.0), Cell::from("Boring")],
            ],
        );

        annotator.run(Some(&mut table)).await.expect("First run failed");
        let after_first = table.clone();
        annotator.run(Some(&mut table)).await.expect("Second run failed");

        assert_eq!(table.headers().len(), 5);
        assert_eq!(table, after_first);
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn batch_failure_aborts_without_writing() {
        let annotator = Annotator::new(Box::new(FakeAnalytics::unauthorized()));
        let mut table = comments(&["Great game!"]);
        let before = table.clone();

        let result = annotator.run(Some(&mut table)).await;

        assert!(matches!(
            result,
            Err(AnnotateError::AnalysisFailed(AnalysisFailure::Client(_)))
        ));
        assert_eq!(table, before);
    }

    #[tokio::test]
    async fn result_count_mismatch_aborts_without_writing() {
        let fake = FakeAnalytics::canned(vec![positive(0.9)], vec![phrases(&["a"]), phrases(&["b"])]);
        let annotator = Annotator::new(Box::new(fake));
        let mut table = comments(&["one", "two"]);
        let before = table.clone();

        let result = annotator.run(Some(&mut table)).await;

        assert!(matches!(
            result,
            Err(AnnotateError::AnalysisFailed(AnalysisFailure::ResultCount {
                expected: 2,
                actual: 1,
                ..
            }))
        ));
        assert_eq!(table, before);
    }

    #[tokio::test]
    async fn keeps_previous_analysis_when_a_rerun_fails() {
        let mut table = comments(&["Great game!"]);
        Annotator::new(Box::new(FakeAnalytics::per_text()))
            .run(Some(&mut table))
            .await
            .expect("First run failed");
        let analyzed = table.clone();

        let result = Annotator::new(Box::new(FakeAnalytics::unauthorized()))
            .run(Some(&mut table))
            .await;

        assert!(result.is_err());
        assert_eq!(table, analyzed);
    }
}
