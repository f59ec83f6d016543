use std::fmt;

/// An operator record that carries an effect condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalEffect {
    /// 1-based line number inside the task file.
    pub line_number: usize,
    /// The trimmed line text.
    pub line: String,
    pub fields: Vec<String>,
}

/// A plan as written by the planner into its plan file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// Ground actions in execution order, without the surrounding parentheses.
    pub actions: Vec<String>,
    /// Cost from the trailing `; cost = ...` comment, if the planner wrote one.
    pub cost: Option<u64>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for action in &self.actions {
            writeln!(f, "({action})")?;
        }
        if let Some(cost) = self.cost {
            writeln!(f, "; cost = {cost}")?;
        }
        Ok(())
    }
}
