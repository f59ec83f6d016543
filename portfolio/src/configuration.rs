use serde::Serialize;
use thiserror::Error;

pub const SEARCH_FLAG: &str = "--search";
pub const HEURISTIC_FLAG: &str = "--heuristic";
pub const LANDMARKS_FLAG: &str = "--landmarks";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("configuration list {0:?} is empty")]
    EmptyList(&'static str),
    #[error("configuration #{index} of {list:?} has weight zero")]
    ZeroWeight { list: &'static str, index: usize },
    #[error("configuration #{index} of {list:?} has {count} search directives, expected one")]
    SearchDirectives {
        list: &'static str,
        index: usize,
        count: usize,
    },
    #[error("configuration #{index} of {list:?} ends with {flag} but no value")]
    MissingValue {
        list: &'static str,
        index: usize,
        flag: &'static str,
    },
}

/// Arguments handed to the planner, in order and unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Configuration {
    pub args: &'static [&'static str],
}

impl Configuration {
    pub const fn new(args: &'static [&'static str]) -> Self {
        Self { args }
    }

    /// The value following the `--search` flag.
    pub fn search_directive(&self) -> Option<&'static str> {
        self.args
            .iter()
            .position(|&arg| arg == SEARCH_FLAG)
            .and_then(|index| self.args.get(index + 1))
            .copied()
    }

    fn validate(&self, list: &'static str, index: usize) -> Result<(), ConfigurationError> {
        let count = self.args.iter().filter(|&&arg| arg == SEARCH_FLAG).count();
        if count != 1 {
            return Err(ConfigurationError::SearchDirectives { list, index, count });
        }

        for (position, &arg) in self.args.iter().enumerate() {
            let flag = match arg {
                SEARCH_FLAG => SEARCH_FLAG,
                HEURISTIC_FLAG => HEURISTIC_FLAG,
                LANDMARKS_FLAG => LANDMARKS_FLAG,
                _ => continue,
            };

            let has_value = self
                .args
                .get(position + 1)
                .map_or(false, |value| !value.starts_with("--"));
            if !has_value {
                return Err(ConfigurationError::MissingValue { list, index, flag });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeightedConfiguration {
    /// Share of the total budget, relative to the other weights of the list.
    pub weight: u32,
    pub configuration: Configuration,
}

impl WeightedConfiguration {
    pub const fn new(weight: u32, args: &'static [&'static str]) -> Self {
        Self {
            weight,
            configuration: Configuration::new(args),
        }
    }
}

/// Ordered configurations, tried front to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigurationList {
    pub name: &'static str,
    pub version: &'static str,
    pub entries: &'static [WeightedConfiguration],
}

impl ConfigurationList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn weights(&self) -> Vec<u32> {
        self.entries.iter().map(|entry| entry.weight).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static WeightedConfiguration> {
        self.entries.iter()
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.entries.is_empty() {
            return Err(ConfigurationError::EmptyList(self.name));
        }

        for (index, entry) in self.entries.iter().enumerate() {
            if entry.weight == 0 {
                return Err(ConfigurationError::ZeroWeight {
                    list: self.name,
                    index,
                });
            }
            entry.configuration.validate(self.name, index)?;
        }

        Ok(())
    }
}
