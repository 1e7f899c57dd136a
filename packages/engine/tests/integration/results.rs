use common::{SubmissionStatus, VotePhase};
use uuid::Uuid;

use crate::common::{TestApp, admin, external, professor, student};

/// Submit, approve and promote a project to finalist. Returns the project
/// id.
async fn finalist(app: &TestApp, event_id: Uuid, owner: &engine::models::Actor, title: &str) -> Uuid {
    let (project, submission) = app.submitted_project(owner, event_id, title, None).await;
    app.approve(submission.id).await;
    app.goto_phase(3);
    app.workflow
        .transition(submission.id, SubmissionStatus::Finalist, &admin())
        .await
        .unwrap();
    project.id
}

mod standings {
    use super::*;

    #[tokio::test]
    async fn staff_final_votes_outweigh_student_votes() {
        let app = TestApp::new();
        let event = app.seeded_event(5).await;
        let a = finalist(&app, event.id, &student(), "Student favorite").await;
        let b = finalist(&app, event.id, &student(), "Jury favorite").await;

        app.goto_phase(4);
        // Two student votes for A, one professor vote for B.
        for _ in 0..2 {
            app.voting
                .cast_vote(&student(), a, event.id, VotePhase::Final)
                .await
                .unwrap();
        }
        app.voting
            .cast_vote(&professor(), b, event.id, VotePhase::Final)
            .await
            .unwrap();

        let results = app.results.compute_results(event.id).await.unwrap();
        assert_eq!(results.standings[0].project_id, b);
        assert_eq!(results.standings[0].final_score, 3);
        assert_eq!(results.standings[1].project_id, a);
        assert_eq!(results.standings[1].final_score, 2);
    }

    #[tokio::test]
    async fn popular_votes_carry_into_the_final_score() {
        let app = TestApp::new();
        let event = app.seeded_event(5).await;
        let a = finalist(&app, event.id, &student(), "Broad support").await;
        let b = finalist(&app, event.id, &student(), "Narrow support").await;
        app.popular_votes(a, event.id, 4).await;

        app.goto_phase(4);
        // One student final vote each; A's popular base breaks the tie.
        app.voting
            .cast_vote(&student(), a, event.id, VotePhase::Final)
            .await
            .unwrap();
        app.voting
            .cast_vote(&student(), b, event.id, VotePhase::Final)
            .await
            .unwrap();

        let results = app.results.compute_results(event.id).await.unwrap();
        assert_eq!(results.standings[0].project_id, a);
        assert_eq!(results.standings[0].final_score, 5);
        assert_eq!(results.standings[1].final_score, 1);
    }

    #[tokio::test]
    async fn a_weighted_final_vote_can_flip_the_popular_order() {
        let app = TestApp::new();
        let event = app.seeded_event(5).await;
        let a = finalist(&app, event.id, &student(), "Popular leader").await;
        let b = finalist(&app, event.id, &student(), "Jury pick").await;
        app.popular_votes(a, event.id, 5).await;
        app.popular_votes(b, event.id, 3).await;

        app.goto_phase(4);
        app.voting
            .cast_vote(&professor(), b, event.id, VotePhase::Final)
            .await
            .unwrap();

        let results = app.results.compute_results(event.id).await.unwrap();
        // 3 popular + one weight-3 final vote beats 5 popular.
        assert_eq!(results.standings[0].project_id, b);
        assert_eq!(results.standings[0].final_score, 6);
        assert_eq!(results.standings[1].project_id, a);
        assert_eq!(results.standings[1].final_score, 5);
    }

    #[tokio::test]
    async fn score_equals_the_popular_tally_without_final_votes() {
        let app = TestApp::new();
        let event = app.seeded_event(5).await;
        let (project, submission) = app
            .submitted_project(&student(), event.id, "Approved only", None)
            .await;
        app.approve(submission.id).await;
        app.popular_votes(project.id, event.id, 3).await;

        let results = app.results.compute_results(event.id).await.unwrap();
        let standing = &results.standings[0];
        assert_eq!(standing.popular_votes, 3);
        assert_eq!(standing.final_score, 3);
        assert_eq!(standing.status, SubmissionStatus::Approved);
    }

    #[tokio::test]
    async fn every_submission_appears_in_the_standings() {
        let app = TestApp::new();
        let event = app.seeded_event(5).await;
        let (_, sa) = app
            .submitted_project(&student(), event.id, "Approved", None)
            .await;
        app.approve(sa.id).await;
        let (_, sr) = app
            .submitted_project(&student(), event.id, "Rejected", None)
            .await;
        app.goto_phase(2);
        app.workflow
            .transition(sr.id, SubmissionStatus::Rejected, &professor())
            .await
            .unwrap();
        app.submitted_project(&student(), event.id, "Pending", None)
            .await;

        let results = app.results.compute_results(event.id).await.unwrap();
        assert_eq!(results.standings.len(), 3);
    }
}

mod winner {
    use super::*;

    #[tokio::test]
    async fn the_top_finalist_is_crowned() {
        let app = TestApp::new();
        let event = app.seeded_event(5).await;
        let a = finalist(&app, event.id, &student(), "Runner-up").await;
        let b = finalist(&app, event.id, &student(), "Champion").await;

        app.goto_phase(4);
        app.voting
            .cast_vote(&student(), a, event.id, VotePhase::Final)
            .await
            .unwrap();
        for voter in [professor(), external()] {
            app.voting
                .cast_vote(&voter, b, event.id, VotePhase::Final)
                .await
                .unwrap();
        }

        let results = app.results.compute_results(event.id).await.unwrap();
        assert_eq!(results.standings[0].project_id, b);
        assert_eq!(results.standings[0].status, SubmissionStatus::Winner);
        assert_eq!(results.standings[1].status, SubmissionStatus::Finalist);
    }

    #[tokio::test]
    async fn the_best_finalist_is_crowned_even_when_an_approved_project_outranks_it() {
        let app = TestApp::new();
        let event = app.seeded_event(5).await;
        let finalist_project = finalist(&app, event.id, &student(), "Jury pick").await;
        let (crowd_project, crowd_submission) = app
            .submitted_project(&student(), event.id, "Crowd pleaser", None)
            .await;
        app.approve(crowd_submission.id).await;

        // The approved project tops the standings on popular votes alone.
        app.popular_votes(crowd_project.id, event.id, 10).await;
        app.popular_votes(finalist_project, event.id, 2).await;
        app.goto_phase(4);
        app.voting
            .cast_vote(&student(), finalist_project, event.id, VotePhase::Final)
            .await
            .unwrap();

        let results = app.results.compute_results(event.id).await.unwrap();
        assert_eq!(results.standings[0].project_id, crowd_project.id);
        assert_eq!(results.standings[0].status, SubmissionStatus::Approved);
        let crowned = results
            .standings
            .iter()
            .find(|s| s.status == SubmissionStatus::Winner)
            .expect("a finalist exists, so one must be crowned");
        assert_eq!(crowned.project_id, finalist_project);
    }

    #[tokio::test]
    async fn recomputing_results_does_not_move_the_crown() {
        let app = TestApp::new();
        let event = app.seeded_event(5).await;
        let a = finalist(&app, event.id, &student(), "Early leader").await;
        let b = finalist(&app, event.id, &student(), "Late surge").await;

        app.goto_phase(4);
        app.voting
            .cast_vote(&student(), a, event.id, VotePhase::Final)
            .await
            .unwrap();
        let first = app.results.compute_results(event.id).await.unwrap();
        assert_eq!(first.standings[0].project_id, a);
        assert_eq!(first.standings[0].status, SubmissionStatus::Winner);

        // B overtakes on score afterwards; the crowned winner stays.
        for voter in [professor(), admin()] {
            app.voting
                .cast_vote(&voter, b, event.id, VotePhase::Final)
                .await
                .unwrap();
        }
        let second = app.results.compute_results(event.id).await.unwrap();
        let winners = second
            .standings
            .iter()
            .filter(|s| s.status == SubmissionStatus::Winner)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(
            second
                .standings
                .iter()
                .find(|s| s.status == SubmissionStatus::Winner)
                .unwrap()
                .project_id,
            a
        );
    }

    #[tokio::test]
    async fn no_winner_is_crowned_without_finalists() {
        let app = TestApp::new();
        let event = app.seeded_event(5).await;
        let (_, submission) = app
            .submitted_project(&student(), event.id, "Approved only", None)
            .await;
        app.approve(submission.id).await;

        let results = app.results.compute_results(event.id).await.unwrap();
        assert!(
            results
                .standings
                .iter()
                .all(|s| s.status != SubmissionStatus::Winner)
        );
    }
}

mod stats {
    use super::*;

    #[tokio::test]
    async fn stats_count_submissions_participants_and_raw_votes() {
        let app = TestApp::new();
        let event = app.seeded_event(5).await;
        let owner = student();
        // Two projects from one owner, one from another.
        let a = finalist(&app, event.id, &owner, "First").await;
        finalist(&app, event.id, &owner, "Second").await;
        let (c, sc) = app
            .submitted_project(&student(), event.id, "Third", None)
            .await;
        app.approve(sc.id).await;

        app.popular_votes(a, event.id, 2).await;
        app.popular_votes(c.id, event.id, 1).await;
        app.goto_phase(4);
        app.voting
            .cast_vote(&professor(), a, event.id, VotePhase::Final)
            .await
            .unwrap();

        let stats = app.results.compute_results(event.id).await.unwrap().stats;
        assert_eq!(stats.submissions, 3);
        assert_eq!(stats.participants, 2);
        assert_eq!(stats.popular_votes, 3);
        // Raw weight as cast; the professor multiplier applies to scores,
        // not to this counter.
        assert_eq!(stats.final_votes, 1);
    }
}
