use swipecity_game::{GamePhase, GamePolicy, RoundBreakAdvance};

use super::simulation::{PlaythroughPlan, PlaythroughSummary};

pub type Expectation = fn(&PlaythroughSummary) -> Result<(), String>;

#[derive(Debug, Clone)]
pub enum ScenarioKind {
    /// One playthrough per iteration, checked against expectations.
    Playthrough {
        plan: PlaythroughPlan,
        expectations: Vec<Expectation>,
    },
    /// Two playthroughs per iteration with the same seed; answers must match.
    Deterministic { plan: PlaythroughPlan },
    /// Random angles through the direction classifier.
    ClassifierSweep { samples: usize },
}

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub description: &'static str,
    pub kind: ScenarioKind,
}

const CATALOG: [(&str, &str); 7] = [
    ("smoke", "Complete one questionnaire with clean swipes"),
    ("reload", "Reload from disk after every answer and resume"),
    ("noise", "Short drags snap back before every real swipe"),
    ("restart", "Restart mid-game and finish from the intro"),
    ("cadence", "Round breaks follow a non-default round size"),
    ("classifier-sweep", "Random angles agree with the sector table"),
    ("deterministic", "Same seed reproduces the same answers"),
];

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG.to_vec()
}

#[must_use]
pub fn all_scenario_names() -> Vec<String> {
    CATALOG.iter().map(|(name, _)| (*name).to_string()).collect()
}

#[must_use]
pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let (key, description) = CATALOG.iter().find(|(key, _)| *key == name)?;
    let kind = match *key {
        "smoke" => ScenarioKind::Playthrough {
            plan: PlaythroughPlan::default(),
            expectations: vec![reaches_results, answers_every_question, breaks_every_five],
        },
        "reload" => ScenarioKind::Playthrough {
            plan: PlaythroughPlan {
                reload_each_answer: true,
                ..PlaythroughPlan::default()
            },
            expectations: vec![reaches_results, answers_every_question, reloaded_each_answer],
        },
        "noise" => ScenarioKind::Playthrough {
            plan: PlaythroughPlan {
                noise_rate: 1.0,
                ..PlaythroughPlan::default()
            },
            expectations: vec![answers_every_question, every_noise_drag_cancelled],
        },
        "restart" => ScenarioKind::Playthrough {
            plan: PlaythroughPlan {
                restart_at: Some(7),
                noise_rate: 0.25,
                ..PlaythroughPlan::default()
            },
            expectations: vec![reaches_results, answers_every_question, restarted_once],
        },
        "cadence" => ScenarioKind::Playthrough {
            plan: PlaythroughPlan {
                policy: GamePolicy {
                    round_size: 4,
                    round_break: RoundBreakAdvance::Manual,
                    ..GamePolicy::default()
                },
                ..PlaythroughPlan::default()
            },
            expectations: vec![answers_every_question, breaks_every_four],
        },
        "classifier-sweep" => ScenarioKind::ClassifierSweep { samples: 2_000 },
        "deterministic" => ScenarioKind::Deterministic {
            plan: PlaythroughPlan {
                noise_rate: 0.5,
                ..PlaythroughPlan::default()
            },
        },
        _ => return None,
    };
    Some(TestScenario {
        name: (*key).to_string(),
        description,
        kind,
    })
}

fn reaches_results(summary: &PlaythroughSummary) -> Result<(), String> {
    if summary.final_phase == GamePhase::Results {
        Ok(())
    } else {
        Err(format!("ended in {} instead of results", summary.final_phase))
    }
}

fn answers_every_question(summary: &PlaythroughSummary) -> Result<(), String> {
    let ids: Vec<u32> = summary.answers.iter().map(|a| a.question_id).collect();
    if ids == (1..=20).collect::<Vec<u32>>() {
        Ok(())
    } else {
        Err(format!("answered questions {ids:?}"))
    }
}

fn expect_breaks(summary: &PlaythroughSummary, expected: &[usize]) -> Result<(), String> {
    if summary.breaks_after == expected {
        Ok(())
    } else {
        Err(format!(
            "round breaks after {:?}, expected {expected:?}",
            summary.breaks_after
        ))
    }
}

fn breaks_every_five(summary: &PlaythroughSummary) -> Result<(), String> {
    expect_breaks(summary, &[0, 5, 10, 15])
}

fn breaks_every_four(summary: &PlaythroughSummary) -> Result<(), String> {
    expect_breaks(summary, &[0, 4, 8, 12, 16])
}

fn reloaded_each_answer(summary: &PlaythroughSummary) -> Result<(), String> {
    if summary.reloads == summary.answers.len() {
        Ok(())
    } else {
        Err(format!("{} reloads for {} answers", summary.reloads, summary.answers.len()))
    }
}

fn every_noise_drag_cancelled(summary: &PlaythroughSummary) -> Result<(), String> {
    if summary.cancellations == summary.answers.len() && summary.gestures == 2 * summary.answers.len() {
        Ok(())
    } else {
        Err(format!(
            "{} cancellations over {} gestures",
            summary.cancellations, summary.gestures
        ))
    }
}

fn restarted_once(summary: &PlaythroughSummary) -> Result<(), String> {
    if summary.restarts == 1 {
        Ok(())
    } else {
        Err(format!("{} restarts", summary.restarts))
    }
}
