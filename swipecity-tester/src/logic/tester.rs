use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::scenarios::{ScenarioKind, TestScenario};
use super::simulation::{
    PlaythroughPlan, PlaythroughSummary, SimulationError, Simulator, classifier_sweep,
};
use super::storage::FileStorage;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    simulator: Simulator,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(simulator: Simulator, verbose: bool) -> Self {
        Self { simulator, verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (seed: {seed}) - {}",
                        scenario.name.bright_white(),
                        scenario.description
                    );
                }
                self.run_single_scenario(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            match self.run_iteration(&scenario.kind, iteration_seed) {
                Ok(note) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    performance_data.push(duration);
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) {note}",
                            i + 1,
                            iterations
                        );
                    }
                }
                Err(err) => {
                    let message = format!("Iteration {} (seed {iteration_seed}): {err}", i + 1);
                    if self.verbose {
                        println!("  ❌ {}", message.clone().red());
                    }
                    log::warn!("{}: {message}", scenario.name);
                    failures.push(message);
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
        }
    }

    /// Run one iteration, returning a short note for verbose output.
    fn run_iteration(&self, kind: &ScenarioKind, seed: u64) -> Result<String, String> {
        match kind {
            ScenarioKind::Playthrough { plan, expectations } => {
                let summary = self.play(plan, seed).map_err(|err| err.to_string())?;
                for expectation in expectations {
                    expectation(&summary)?;
                }
                Ok(describe(&summary))
            }
            ScenarioKind::Deterministic { plan } => {
                let first = self.play(plan, seed).map_err(|err| err.to_string())?;
                let second = self.play(plan, seed).map_err(|err| err.to_string())?;
                if first.fingerprint != second.fingerprint || first.answers != second.answers {
                    return Err(format!(
                        "fingerprints diverged: {:016x} vs {:016x}",
                        first.fingerprint, second.fingerprint
                    ));
                }
                Ok(format!("fingerprint {:016x}", first.fingerprint))
            }
            ScenarioKind::ClassifierSweep { samples } => classifier_sweep(seed, *samples)
                .map(|checked| format!("{checked} angles"))
                .map_err(|err| err.to_string()),
        }
    }

    fn play(&self, plan: &PlaythroughPlan, seed: u64) -> Result<PlaythroughSummary, SimulationError> {
        let storage = FileStorage::scratch("run", seed)?;
        let outcome = self.simulator.run(plan, seed, &storage);
        storage.remove();
        outcome
    }
}

fn describe(summary: &PlaythroughSummary) -> String {
    format!(
        "answers:{} gestures:{} cancels:{} reloads:{} restarts:{}",
        summary.answers.len(),
        summary.gestures,
        summary.cancellations,
        summary.reloads,
        summary.restarts
    )
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::get_scenario;
    use crate::logic::scenarios::Expectation;

    fn tester() -> LogicTester {
        LogicTester::new(Simulator::new().unwrap(), false)
    }

    #[test]
    fn smoke_passes_for_several_seeds() {
        let scenario = get_scenario("smoke").unwrap();
        let results = tester().run_scenario(&scenario, &[1, 2], 3);
        assert_eq!(results.len(), 2);
        for result in &results {
            assert!(result.passed, "{:?}", result.failures);
            assert_eq!(result.successful_iterations, 3);
        }
    }

    #[test]
    fn failing_expectation_is_reported() {
        fn never(_: &PlaythroughSummary) -> Result<(), String> {
            Err(String::from("nope"))
        }
        let scenario = TestScenario {
            name: String::from("always-fails"),
            description: "",
            kind: ScenarioKind::Playthrough {
                plan: PlaythroughPlan::default(),
                expectations: vec![never as Expectation],
            },
        };
        let result = &tester().run_scenario(&scenario, &[9], 2)[0];
        assert!(!result.passed);
        assert_eq!(result.failures.len(), 2);
        assert!(result.failures[0].contains("nope"));
        assert_eq!(result.average_duration, Duration::ZERO);
    }

    #[test]
    fn durations_serialize_as_millis() {
        let result = ScenarioResult {
            scenario_name: String::from("smoke"),
            seed: 1,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_millis(12),
            performance_data: vec![Duration::from_millis(12)],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 12);
        assert_eq!(json["performance_data"][0], 12);
    }
}
