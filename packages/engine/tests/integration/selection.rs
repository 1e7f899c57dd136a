use std::collections::HashSet;

use common::SubmissionStatus;
use engine::WorkflowError;
use uuid::Uuid;

use crate::common::{TestApp, admin, student};

/// Submit and approve `titles.len()` projects, then give each the paired
/// number of popular votes. Returns (project_id, submission_id) pairs in
/// input order.
async fn approved_field(
    app: &TestApp,
    event_id: Uuid,
    entries: &[(&str, u32)],
) -> Vec<(Uuid, Uuid)> {
    let mut out = Vec::new();
    for (title, votes) in entries {
        let (project, submission) = app
            .submitted_project(&student(), event_id, title, None)
            .await;
        app.approve(submission.id).await;
        app.popular_votes(project.id, event_id, *votes).await;
        out.push((project.id, submission.id));
    }
    out
}

async fn statuses(app: &TestApp, event_id: Uuid) -> Vec<(Uuid, SubmissionStatus)> {
    use engine::store::DemodayStore;
    app.store
        .submissions_for_event(event_id)
        .await
        .unwrap()
        .iter()
        .map(|s| (s.project_id, s.status))
        .collect()
}

mod selecting {
    use super::*;

    #[tokio::test]
    async fn top_projects_by_popular_vote_become_finalists() {
        let app = TestApp::new();
        let event = app.seeded_event(3).await;
        let field = approved_field(
            &app,
            event.id,
            &[("A", 10), ("B", 8), ("C", 6), ("D", 4), ("E", 2)],
        )
        .await;

        let results = app
            .selection
            .select_finalists(&admin(), event.id)
            .await
            .unwrap();

        // One bucket: the uncategorized one.
        assert_eq!(results.len(), 1);
        let bucket = &results[0];
        assert_eq!(bucket.category_id, None);
        assert_eq!(bucket.max_finalists, 3);
        assert_eq!(bucket.selected, 3);
        let selected: Vec<Uuid> = bucket.finalists.iter().map(|f| f.project_id).collect();
        assert_eq!(selected, vec![field[0].0, field[1].0, field[2].0]);

        for (project_id, status) in statuses(&app, event.id).await {
            let expect_finalist = selected.contains(&project_id);
            assert_eq!(
                status == SubmissionStatus::Finalist,
                expect_finalist,
                "wrong status for {project_id}"
            );
        }
    }

    #[tokio::test]
    async fn reselection_replaces_stale_finalists_instead_of_accumulating() {
        let app = TestApp::new();
        let event = app.seeded_event(3).await;
        let field = approved_field(
            &app,
            event.id,
            &[("A", 10), ("B", 8), ("C", 6), ("D", 4), ("E", 2)],
        )
        .await;
        app.selection
            .select_finalists(&admin(), event.id)
            .await
            .unwrap();

        // E overtakes C and D with a late surge.
        app.popular_votes(field[4].0, event.id, 7).await;
        let results = app
            .selection
            .select_finalists(&admin(), event.id)
            .await
            .unwrap();

        let selected: HashSet<Uuid> = results[0].finalists.iter().map(|f| f.project_id).collect();
        assert_eq!(
            selected,
            HashSet::from([field[0].0, field[1].0, field[4].0])
        );

        let finalists = statuses(&app, event.id)
            .await
            .into_iter()
            .filter(|(_, s)| *s == SubmissionStatus::Finalist)
            .count();
        assert_eq!(finalists, 3, "cap must hold across reruns");
    }

    #[tokio::test]
    async fn reselection_over_unchanged_data_is_idempotent() {
        let app = TestApp::new();
        let event = app.seeded_event(2).await;
        approved_field(&app, event.id, &[("A", 5), ("B", 3), ("C", 1)]).await;

        let first = app
            .selection
            .select_finalists(&admin(), event.id)
            .await
            .unwrap();
        let second = app
            .selection
            .select_finalists(&admin(), event.id)
            .await
            .unwrap();

        let ids = |r: &[engine::models::SelectionResult]| -> Vec<Uuid> {
            r[0].finalists.iter().map(|f| f.submission_id).collect()
        };
        assert_eq!(ids(&first), ids(&second));
    }

    #[tokio::test]
    async fn fewer_candidates_than_the_cap_selects_them_all() {
        let app = TestApp::new();
        let event = app.seeded_event(5).await;
        approved_field(&app, event.id, &[("A", 2), ("B", 1)]).await;

        let results = app
            .selection
            .select_finalists(&admin(), event.id)
            .await
            .unwrap();
        assert_eq!(results[0].selected, 2);
        assert_eq!(results[0].max_finalists, 5);
    }

    #[tokio::test]
    async fn rejected_submissions_are_never_candidates() {
        let app = TestApp::new();
        let event = app.seeded_event(3).await;
        approved_field(&app, event.id, &[("A", 1)]).await;
        let (_, rejected) = app
            .submitted_project(&student(), event.id, "Rejected", None)
            .await;
        app.goto_phase(2);
        app.workflow
            .transition(rejected.id, SubmissionStatus::Rejected, &admin())
            .await
            .unwrap();

        let results = app
            .selection
            .select_finalists(&admin(), event.id)
            .await
            .unwrap();
        assert_eq!(results[0].selected, 1);
    }

    #[tokio::test]
    async fn only_admins_select_finalists() {
        let app = TestApp::new();
        let event = app.seeded_event(3).await;
        let err = app
            .selection
            .select_finalists(&student(), event.id)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden));
    }
}

mod categories {
    use super::*;

    #[tokio::test]
    async fn each_category_gets_its_own_cap() {
        let app = TestApp::new();
        let event = app.seeded_event(1).await;
        let web = app.add_category(event.id, "Web", 2).await;
        let mobile = app.add_category(event.id, "Mobile", 1).await;

        // Two web entries, two mobile entries, one uncategorized.
        let mut submitted = Vec::new();
        for (title, category, votes) in [
            ("Web A", Some(web), 4u32),
            ("Web B", Some(web), 3),
            ("Mobile A", Some(mobile), 5),
            ("Mobile B", Some(mobile), 6),
            ("Loose", None, 9),
        ] {
            let (project, submission) = app
                .submitted_project(&student(), event.id, title, category)
                .await;
            app.approve(submission.id).await;
            app.popular_votes(project.id, event.id, votes).await;
            submitted.push(project.id);
        }

        let results = app
            .selection
            .select_finalists(&admin(), event.id)
            .await
            .unwrap();

        // One result per category plus the uncategorized bucket, last.
        assert_eq!(results.len(), 3);
        let web_bucket = results.iter().find(|r| r.category_id == Some(web)).unwrap();
        assert_eq!(web_bucket.selected, 2);

        let mobile_bucket = results
            .iter()
            .find(|r| r.category_id == Some(mobile))
            .unwrap();
        assert_eq!(mobile_bucket.selected, 1);
        assert_eq!(mobile_bucket.finalists[0].project_id, submitted[3]);

        let loose_bucket = results.last().unwrap();
        assert_eq!(loose_bucket.category_id, None);
        assert_eq!(loose_bucket.selected, 1);
        assert_eq!(loose_bucket.finalists[0].project_id, submitted[4]);
    }

    #[tokio::test]
    async fn empty_categories_appear_in_the_audit_trail() {
        let app = TestApp::new();
        let event = app.seeded_event(3).await;
        let ghost = app.add_category(event.id, "Ghost town", 2).await;

        let results = app
            .selection
            .select_finalists(&admin(), event.id)
            .await
            .unwrap();
        let bucket = results
            .iter()
            .find(|r| r.category_id == Some(ghost))
            .unwrap();
        assert_eq!(bucket.selected, 0);
        assert!(bucket.finalists.is_empty());
    }
}
