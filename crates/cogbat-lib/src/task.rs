use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six tasks of the tablet battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskId {
    Task1,
    Task2,
    Task3,
    Task4,
    Task5,
    Task6,
}

impl TaskId {
    pub const ALL: [TaskId; 6] = [
        TaskId::Task1,
        TaskId::Task2,
        TaskId::Task3,
        TaskId::Task4,
        TaskId::Task5,
        TaskId::Task6,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskId::Task1 => "task1",
            TaskId::Task2 => "task2",
            TaskId::Task3 => "task3",
            TaskId::Task4 => "task4",
            TaskId::Task5 => "task5",
            TaskId::Task6 => "task6",
        }
    }

    /// Log grammar used to read this task's files.
    pub fn log_format(&self, task5: Task5Format) -> LogFormat {
        match self {
            TaskId::Task1 | TaskId::Task6 => LogFormat::PairedAssociates,
            TaskId::Task2 => LogFormat::Switching,
            TaskId::Task3 => LogFormat::SpatialMemory,
            TaskId::Task4 => LogFormat::ImplicitLearning,
            TaskId::Task5 => match task5 {
                Task5Format::VisualSearch => LogFormat::VisualSearch,
                Task5Format::Stopping => LogFormat::Stopping,
            },
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskId::ALL
            .into_iter()
            .find(|task| task.as_str() == s)
            .ok_or_else(|| ParseError::TaskName(s.to_string()))
    }
}

/// Which of the two task-5 log layouts a batch contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Task5Format {
    /// One summary row per practice/task block.
    #[default]
    VisualSearch,
    /// One row per go/stop trial.
    Stopping,
}

/// Distinct log-file grammars. Tasks 1 and 6 share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    PairedAssociates,
    Switching,
    SpatialMemory,
    ImplicitLearning,
    VisualSearch,
    Stopping,
}

/// Static description of one log grammar.
#[derive(Debug)]
pub struct TaskGrammar {
    /// Metadata lines at the top of the file that carry no trial data.
    pub preamble_lines: usize,
    /// First-cell marker of the row that separates practice from task rows.
    pub sentinel: &'static str,
    /// Number of captured columns before any derived field is added.
    pub raw_width: usize,
    pub practice_headers: &'static [&'static str],
    pub task_headers: &'static [&'static str],
}

const PAIRED_ASSOCIATES: TaskGrammar = TaskGrammar {
    preamble_lines: 3,
    sentinel: "Task",
    raw_width: 3,
    practice_headers: &["TrialNum", "NumBadTouches", "Score"],
    task_headers: &["TrialNum", "NumBadTouches", "Score", "Score-incorrect only"],
};

const SWITCHING: TaskGrammar = TaskGrammar {
    preamble_lines: 3,
    sentinel: "Task",
    raw_width: 8,
    practice_headers: &[
        "TrialNum",
        "TargetSide",
        "TimeOut",
        "ReactionTime",
        "TouchPosition",
        "DistanceFromCenter",
        "PressedSide",
        "Correct",
    ],
    task_headers: &[
        "TrialNum",
        "TargetSide",
        "TimeOut",
        "ReactionTime",
        "TouchPosition",
        "DistanceFromCenter",
        "PressedSide",
        "GoalSide",
        "Correct",
        "SwitchRule",
        "SwitchSide",
    ],
};

const SPATIAL_MEMORY: TaskGrammar = TaskGrammar {
    preamble_lines: 2,
    sentinel: "Task",
    raw_width: 10,
    practice_headers: &[
        "TrialNum",
        "NumDots",
        "ShownDots",
        "Delay",
        "TimeOut",
        "EarlyResponse",
        "DotPressed",
        "ReactionTime",
        "TouchPosition",
        "DistanceFromCenter",
    ],
    task_headers: &[
        "TrialNum",
        "NumDots",
        "ShownDots",
        "Delay",
        "TimeOut",
        "EarlyResponse",
        "DotPressed",
        "ReactionTime",
        "TouchPosition",
        "DistanceFromCenter",
        "Rank",
    ],
};

const IMPLICIT_LEARNING: TaskGrammar = TaskGrammar {
    preamble_lines: 2,
    sentinel: "Block",
    raw_width: 4,
    practice_headers: &[
        "TrialNum",
        "Correct",
        "ResponseTime",
        "TouchPosition",
        "DistanceFromCenter",
    ],
    task_headers: &[
        "Block",
        "PercentCorrect",
        "AvgDistanceFromCenter",
        "AvgResponseTime",
    ],
};

const VISUAL_SEARCH: TaskGrammar = TaskGrammar {
    preamble_lines: 1,
    sentinel: "Task",
    raw_width: 14,
    practice_headers: &[
        "Practice",
        "EndCondition",
        "Duration",
        "NumGoodTouches",
        "NumBadTouches",
        "NumRepeats",
        "AvgTimePerTarget",
        "StandardDeviation",
        "AvgTimePerAction",
        "AvgTargetsPerArea",
        "AvgLocation",
        "AvgFirstTen",
        "AvgLastTen",
        "AvgDistancePerTarget",
        "Trial",
    ],
    task_headers: &[
        "Task",
        "EndCondition",
        "Duration",
        "NumGoodTouches",
        "NumBadTouches",
        "NumRepeats",
        "AvgTimePerTarget",
        "StandardDeviation",
        "AvgTimePerAction",
        "AvgTargetsPerArea",
        "AvgLocation",
        "AvgFirstTen",
        "AvgLastTen",
        "AvgDistancePerTarget",
    ],
};

const STOPPING: TaskGrammar = TaskGrammar {
    preamble_lines: 3,
    sentinel: "Trial",
    raw_width: 7,
    practice_headers: &[
        "TrialNum",
        "TurnedOrange",
        "TurningTime",
        "Correct",
        "ReactionTime",
        "TouchPosition",
        "DistanceFromCenter",
    ],
    task_headers: &[
        "TrialNum",
        "TurnedOrange",
        "TurningTime",
        "Correct",
        "ReactionTime",
        "TouchPosition",
        "DistanceFromCenter",
        "PrevTrialOrange",
    ],
};

impl LogFormat {
    pub const fn grammar(self) -> &'static TaskGrammar {
        match self {
            LogFormat::PairedAssociates => &PAIRED_ASSOCIATES,
            LogFormat::Switching => &SWITCHING,
            LogFormat::SpatialMemory => &SPATIAL_MEMORY,
            LogFormat::ImplicitLearning => &IMPLICIT_LEARNING,
            LogFormat::VisualSearch => &VISUAL_SEARCH,
            LogFormat::Stopping => &STOPPING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_task_names() {
        assert_eq!("task3".parse::<TaskId>().unwrap(), TaskId::Task3);
        let err = "task7".parse::<TaskId>().unwrap_err();
        assert!(matches!(err, ParseError::TaskName(name) if name == "task7"));
        assert!("Task1".parse::<TaskId>().is_err());
    }

    #[test]
    fn tasks_one_and_six_share_a_grammar() {
        let default = Task5Format::default();
        assert_eq!(
            TaskId::Task1.log_format(default),
            TaskId::Task6.log_format(default)
        );
        assert_eq!(TaskId::Task5.log_format(default), LogFormat::VisualSearch);
        assert_eq!(
            TaskId::Task5.log_format(Task5Format::Stopping),
            LogFormat::Stopping
        );
    }

    #[test]
    fn derived_columns_extend_the_practice_headers() {
        for format in [
            LogFormat::PairedAssociates,
            LogFormat::SpatialMemory,
            LogFormat::Stopping,
        ] {
            let grammar = format.grammar();
            assert_eq!(
                grammar.task_headers.len(),
                grammar.practice_headers.len() + 1
            );
            assert_eq!(
                &grammar.task_headers[..grammar.practice_headers.len()],
                grammar.practice_headers
            );
        }
        assert_eq!(LogFormat::Switching.grammar().task_headers.len(), 11);
    }
}
