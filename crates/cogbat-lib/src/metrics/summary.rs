use super::{mean, Summary};
use crate::record::TrialRecord;
use crate::task::TaskId;
use crate::value::Value;

const DELAY_TOLERANCE: f64 = 1e-9;

/// Reduce a file's task trials to its summary scalars.
pub fn summarize(task: TaskId, trials: &[TrialRecord]) -> Summary {
    match task {
        TaskId::Task1 => paired_associates("T1", trials),
        TaskId::Task2 => switching(trials),
        TaskId::Task3 => spatial_memory(trials),
        TaskId::Task4 => implicit_learning(trials),
        TaskId::Task5 => visual_search(trials),
        TaskId::Task6 => paired_associates("T6", trials),
    }
}

fn numbers<'a>(trials: impl IntoIterator<Item = &'a TrialRecord>, field: &str) -> Vec<Option<f64>> {
    trials
        .into_iter()
        .map(|trial| trial.get(field).as_f64())
        .collect()
}

/// Bad touches and incorrect-only scores over all trials and each half.
/// The halves split at `n / 2`.
pub fn paired_associates(prefix: &str, trials: &[TrialRecord]) -> Summary {
    let bad_touches = numbers(trials, "NumBadTouches");
    let scores: Vec<Option<f64>> = trials
        .iter()
        .map(|trial| {
            let score = trial.get("Score-incorrect only");
            if score.is_truthy() {
                score.as_f64()
            } else {
                None
            }
        })
        .collect();
    let mid = trials.len() / 2;

    let mut summary = Summary::new();
    let mut put = |name: &str, value: Option<f64>| {
        summary.insert(format!("{}_{}", prefix, name), value);
    };
    put("BadTouchesAllTrials", mean(bad_touches.iter().copied()));
    put("BadTouchesFirst", mean(bad_touches[..mid].iter().copied()));
    put("BadTouchesLast", mean(bad_touches[mid..].iter().copied()));
    put("ScoreAllTrials", mean(scores.iter().copied()));
    put("ScoreFirst", mean(scores[..mid].iter().copied()));
    put("ScoreLast", mean(scores[mid..].iter().copied()));
    summary
}

/// Accuracy and reaction time per trial type: switch/non-switch rule,
/// switch/non-switch side, same/opposite target.
pub fn switching(trials: &[TrialRecord]) -> Summary {
    let flagged = |field: &'static str, wanted: bool| {
        move |trial: &&TrialRecord| trial.get(field).as_bool() == Some(wanted)
    };
    let target = |wanted: &'static str| {
        move |trial: &&TrialRecord| trial.get("TargetSide").as_text() == Some(wanted)
    };

    let groups: [(&str, Vec<&TrialRecord>); 6] = [
        ("SwitchRule", trials.iter().filter(flagged("SwitchRule", true)).collect()),
        ("NonSwitchRule", trials.iter().filter(flagged("SwitchRule", false)).collect()),
        ("SwitchSide", trials.iter().filter(flagged("SwitchSide", true)).collect()),
        ("NonSwitchSide", trials.iter().filter(flagged("SwitchSide", false)).collect()),
        ("Same", trials.iter().filter(target("same")).collect()),
        ("Opposite", trials.iter().filter(target("opposite")).collect()),
    ];

    let mut summary = Summary::new();
    for (label, group) in &groups {
        let accuracy = mean(numbers(group.iter().copied(), "Correct"));
        let reaction = mean(numbers(group.iter().copied(), "ReactionTime"));
        // The rule/side groups carry "Avg" in their accuracy names.
        let accuracy_name = match *label {
            "Same" | "Opposite" => format!("T2_{}Accuracy", label),
            _ => format!("T2_{}AvgAccuracy", label),
        };
        summary.insert(accuracy_name, accuracy);
        summary.insert(format!("T2_{}RT", label), reaction);
    }
    summary
}

/// Dot presses grouped into trials by contiguous trial number.
fn group_presses(presses: &[TrialRecord]) -> Vec<Vec<&TrialRecord>> {
    let mut trials: Vec<Vec<&TrialRecord>> = Vec::new();
    let mut current: Option<&Value> = None;
    for press in presses {
        let trial_num = press.get("TrialNum");
        if current == Some(trial_num) {
            if let Some(trial) = trials.last_mut() {
                trial.push(press);
                continue;
            }
        }
        trials.push(vec![press]);
        current = Some(trial_num);
    }
    trials
}

/// Mean distance from center by load (presses per trial) and by delay.
pub fn spatial_memory(presses: &[TrialRecord]) -> Summary {
    let trials = group_presses(presses);
    let mut summary = Summary::new();

    for load in 1..=3 {
        let per_trial = trials.iter().filter(|trial| trial.len() == load).map(|trial| {
            mean(trial.iter().map(|press| {
                let distance = press.get("DistanceFromCenter");
                if distance.is_truthy() {
                    distance.as_f64()
                } else {
                    None
                }
            }))
        });
        summary.insert(format!("T3_Load{}Distance", load), mean(per_trial));
    }

    for (label, delay) in [("0.1", 0.1), ("3", 3.0)] {
        let per_trial = trials
            .iter()
            .filter(|trial| {
                trial[0]
                    .get("Delay")
                    .as_f64()
                    .is_some_and(|d| (d - delay).abs() < DELAY_TOLERANCE)
            })
            .map(|trial| mean(numbers(trial.iter().copied(), "DistanceFromCenter")));
        summary.insert(format!("T3_Delay{}Distance", label), mean(per_trial));
    }
    summary
}

fn block_number(block: &TrialRecord) -> Option<i64> {
    block.get("Block").as_f64().map(|n| n as i64)
}

fn response_times(blocks: &[TrialRecord], wanted: &[i64]) -> Vec<Option<f64>> {
    blocks
        .iter()
        .filter(|block| block_number(block).is_some_and(|n| wanted.contains(&n)))
        .map(|block| block.get("AvgResponseTime").as_f64())
        .collect()
}

/// Response time for random blocks (1, 4) against rule blocks (2, 3, 5).
/// Blocks 4 and 5 are also passed through on their own.
pub fn implicit_learning(blocks: &[TrialRecord]) -> Summary {
    let mut summary = Summary::new();
    summary.insert("T4_RandomRT".into(), mean(response_times(blocks, &[1, 4])));
    summary.insert("T4_RuleRT".into(), mean(response_times(blocks, &[2, 3, 5])));
    summary.insert("T4_Block4RT".into(), response_times(blocks, &[4]).into_iter().flatten().next());
    summary.insert("T4_Block5RT".into(), response_times(blocks, &[5]).into_iter().flatten().next());
    summary
}

/// Per-field means across the task blocks.
pub fn visual_search(blocks: &[TrialRecord]) -> Summary {
    ["NumBadTouches", "NumRepeats", "AvgDistancePerTarget"]
        .into_iter()
        .map(|field| (format!("T5_{}", field), mean(numbers(blocks, field))))
        .collect()
}
