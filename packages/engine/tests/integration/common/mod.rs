use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use common::{Role, SubmissionStatus, VotePhase};
use uuid::Uuid;

use engine::clock::Clock;
use engine::config::ScoringConfig;
use engine::models::{
    Actor, CriterionMark, Event, NewCategory, NewEvent, NewProject, PhaseSpec, Project, Submission,
};
use engine::store::MemoryStore;
use engine::{
    EventAdmin, FinalistSelector, ResultsAggregator, SubmissionService, SubmissionWorkflow,
    VoteLedger,
};

/// Settable clock so tests can walk an event through its phase calendar
/// without waiting.
pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// All engine services wired over one in-memory store and one settable
/// clock.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<TestClock>,
    pub events: EventAdmin,
    pub submissions: SubmissionService,
    pub workflow: SubmissionWorkflow,
    pub voting: VoteLedger,
    pub selection: FinalistSelector,
    pub results: ResultsAggregator,
}

impl TestApp {
    pub fn new() -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(TestClock::new(day(3, 1)));
        let scoring = ScoringConfig::default();

        let store_dyn: Arc<dyn engine::store::DemodayStore> = store.clone();
        let workflow = SubmissionWorkflow::new(store_dyn.clone(), clock.clone(), scoring.clone());
        Self {
            events: EventAdmin::new(store_dyn.clone(), clock.clone()),
            submissions: SubmissionService::new(store_dyn.clone(), clock.clone()),
            voting: VoteLedger::new(store_dyn.clone(), clock.clone()),
            selection: FinalistSelector::new(store_dyn.clone(), clock.clone()),
            results: ResultsAggregator::new(store_dyn, workflow.clone(), scoring),
            workflow,
            store,
            clock,
        }
    }

    /// Create and activate an event with the standard four-phase calendar:
    /// submission Mar 1-7, screening Mar 8-14, popular vote Mar 15-21,
    /// final vote Mar 22-28 (2026).
    pub async fn seeded_event(&self, max_finalists: u32) -> Event {
        let admin = admin();
        let event = self
            .events
            .create_event(
                &admin,
                NewEvent {
                    name: "Demoday 2026".into(),
                    max_finalists,
                },
            )
            .await
            .unwrap();
        self.events
            .set_phases(&admin, event.id, standard_phases())
            .await
            .unwrap();
        self.events.activate_event(&admin, event.id).await.unwrap()
    }

    pub async fn add_category(&self, event_id: Uuid, name: &str, max_finalists: u32) -> Uuid {
        self.events
            .add_category(
                &admin(),
                event_id,
                NewCategory {
                    name: name.into(),
                    max_finalists,
                },
            )
            .await
            .unwrap()
            .id
    }

    /// Jump the clock to midday of the given phase's window.
    pub fn goto_phase(&self, number: u8) {
        let start_day = match number {
            1 => 1,
            2 => 8,
            3 => 15,
            4 => 22,
            _ => panic!("no such phase: {number}"),
        };
        self.clock.set(day(3, start_day + 2));
    }

    /// Register a project for `owner` and submit it to the event during
    /// phase 1. Leaves the clock in phase 1.
    pub async fn submitted_project(
        &self,
        owner: &Actor,
        event_id: Uuid,
        title: &str,
        category_id: Option<Uuid>,
    ) -> (Project, Submission) {
        self.goto_phase(1);
        let project = self
            .submissions
            .register_project(
                owner,
                NewProject {
                    title: title.into(),
                    description: "built during the semester".into(),
                    kind: "web".into(),
                    category_id,
                    contact_email: "team@example.com".into(),
                },
            )
            .await
            .unwrap();
        let submission = self
            .submissions
            .submit_project(owner, project.id, event_id)
            .await
            .unwrap();
        (project, submission)
    }

    /// Screen a submission to `Approved` with a full-marks evaluation.
    /// Leaves the clock in phase 2.
    pub async fn approve(&self, submission_id: Uuid) {
        self.goto_phase(2);
        let outcome = self
            .workflow
            .submit_evaluation(submission_id, &professor(), passing_marks())
            .await
            .unwrap();
        assert_eq!(outcome.submission.status, SubmissionStatus::Approved);
    }

    /// Cast `n` popular votes from distinct student voters. Leaves the
    /// clock in phase 3.
    pub async fn popular_votes(&self, project_id: Uuid, event_id: Uuid, n: u32) {
        self.goto_phase(3);
        for _ in 0..n {
            self.voting
                .cast_vote(&student(), project_id, event_id, VotePhase::Popular)
                .await
                .unwrap();
        }
    }
}

pub fn day(month: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, month, d, 12, 0, 0).unwrap()
}

pub fn standard_phases() -> Vec<PhaseSpec> {
    let window = |number: u8, name: &str, start: u32, end: u32| PhaseSpec {
        number,
        name: name.into(),
        description: String::new(),
        starts_at: Utc.with_ymd_and_hms(2026, 3, start, 0, 0, 0).unwrap(),
        ends_at: Utc.with_ymd_and_hms(2026, 3, end, 23, 59, 59).unwrap(),
    };
    vec![
        window(1, "Submission", 1, 7),
        window(2, "Screening", 8, 14),
        window(3, "Popular vote", 15, 21),
        window(4, "Final vote", 22, 28),
    ]
}

pub fn admin() -> Actor {
    Actor::new(Uuid::new_v4(), Role::Admin)
}

pub fn professor() -> Actor {
    Actor::new(Uuid::new_v4(), Role::Professor)
}

pub fn student() -> Actor {
    Actor::new(Uuid::new_v4(), Role::StudentUfba)
}

pub fn external() -> Actor {
    Actor::new(Uuid::new_v4(), Role::StudentExternal)
}

pub fn passing_marks() -> Vec<CriterionMark> {
    ["originality", "execution", "pitch", "impact"]
        .into_iter()
        .map(|criterion| CriterionMark {
            criterion: criterion.into(),
            approved: true,
        })
        .collect()
}

pub fn failing_marks() -> Vec<CriterionMark> {
    ["originality", "execution", "pitch", "impact"]
        .into_iter()
        .enumerate()
        .map(|(i, criterion)| CriterionMark {
            criterion: criterion.into(),
            approved: i == 0,
        })
        .collect()
}
