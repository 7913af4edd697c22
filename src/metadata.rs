//! Exercise listing info shown by the host's exercise picker

use serde::{Deserialize, Serialize};

use crate::config::ExerciseConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseMetadata {
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
}

impl ExerciseMetadata {
    pub fn for_config(config: &ExerciseConfig) -> Self {
        let delay_secs = config.launch_delay().as_secs_f64();
        Self {
            name: "Clay Buster".to_string(),
            version: "1.0".to_string(),
            author: "phrack".to_string(),
            description: format!(
                "This exercise randomly launches a clay left or right at \
                 slightly varying velocities every {delay_secs} seconds."
            ),
        }
    }
}
