// The translated task format is line oriented, so the scan itself is a plain
// forward iteration and chumsky only recognizes individual records.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use chumsky::{prelude::*, Parser};
use log::{debug, info, trace};
use structs::{ConditionalEffect, Plan};
use thiserror::Error;

pub mod structs;

pub const BEGIN_OPERATOR: &str = "begin_operator";
pub const END_OPERATOR: &str = "end_operator";

/// Number of fields of an effect record with at least one effect condition:
/// condition count, one (var, value) condition, then var, pre and post.
pub const MIN_CONDITIONAL_EFFECT_FIELDS: usize = 6;

#[derive(Debug, Error)]
pub enum SasParseError {
    #[error("could not open task file {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not read task file")]
    Read(#[from] io::Error),
    #[error("malformed plan line {line}")]
    PlanParse {
        line: usize,
        errors: Vec<Simple<char>>,
    },
}

/// Scans the lines of a translated task for the first conditional effect.
///
/// Lines are pulled one at a time and the scan stops at the first match, so
/// nothing after the evidence line is ever read.
pub fn find_conditional_effect<I>(lines: I) -> Result<Option<ConditionalEffect>, SasParseError>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let parser = conditional_effect_parser();
    let mut in_operator = false;

    for (index, line) in lines.into_iter().enumerate() {
        let line = line?;
        let line = line.trim();

        if line == BEGIN_OPERATOR {
            in_operator = true;
        } else if line == END_OPERATOR {
            in_operator = false;
        } else if in_operator {
            // Cheap reject for names, counts and unconditional effects.
            if line
                .split_whitespace()
                .nth(MIN_CONDITIONAL_EFFECT_FIELDS - 1)
                .is_none()
            {
                continue;
            }

            match parser.parse(line) {
                Ok(fields) => {
                    return Ok(Some(ConditionalEffect {
                        line_number: index + 1,
                        line: line.to_owned(),
                        fields,
                    }))
                }
                Err(errors) => trace!("line {} is not an effect record: {errors:?}", index + 1),
            }
        }
    }

    Ok(None)
}

/// Same as [`find_conditional_effect`], reading the task from disk.
pub fn find_conditional_effect_in_file(
    path: impl AsRef<Path>,
) -> Result<Option<ConditionalEffect>, SasParseError> {
    let path = path.as_ref();
    debug!("scanning {path:?} for conditional effects");

    let file = File::open(path).map_err(|source| SasParseError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    // Atom names are not guaranteed to be UTF-8 and never matter here.
    let lines = BufReader::new(file)
        .split(b'\n')
        .map(|line| line.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()));

    find_conditional_effect(lines)
}

/// Returns whether the task at `path` uses conditional effects.
pub fn has_conditional_effects(path: impl AsRef<Path>) -> Result<bool, SasParseError> {
    let evidence = find_conditional_effect_in_file(path)?;

    match &evidence {
        Some(effect) => info!(
            "Task has at least one conditional effect (line {}): {}",
            effect.line_number, effect.line
        ),
        None => info!("Task has no conditional effects"),
    }

    Ok(evidence.is_some())
}

/// Parses the contents of a plan file.
pub fn parse_plan(content: &str) -> Result<Plan, SasParseError> {
    let parser = plan_line_parser();
    let mut plan = Plan::default();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parsed = parser
            .parse(line)
            .map_err(|errors| SasParseError::PlanParse {
                line: index + 1,
                errors,
            })?;

        match parsed {
            PlanLine::Action(action) => plan.actions.push(action),
            PlanLine::Cost(cost) => plan.cost = Some(cost),
            PlanLine::Comment => trace!("skipping plan comment: {line}"),
        }
    }

    Ok(plan)
}

pub(crate) fn conditional_effect_parser() -> impl Parser<char, Vec<String>, Error = Simple<char>>
{
    let digits = filter(|c: &char| c.is_ascii_digit()).repeated().at_least(1);

    let field = just('-')
        .or_not()
        .chain::<char, Vec<char>, _>(digits)
        .collect::<String>()
        .labelled("field");

    let separator = filter(|c: &char| c.is_whitespace())
        .repeated()
        .at_least(1)
        .ignored()
        .labelled("separator");

    field
        .separated_by(separator)
        .at_least(MIN_CONDITIONAL_EFFECT_FIELDS)
        .then_ignore(end())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlanLine {
    Action(String),
    Cost(u64),
    Comment,
}

pub(crate) fn plan_line_parser() -> impl Parser<char, PlanLine, Error = Simple<char>> {
    let action = filter(|c: &char| *c != '(' && *c != ')')
        .repeated()
        .at_least(1)
        .collect::<String>()
        .delimited_by(just('('), just(')'))
        .map(|action| PlanLine::Action(action.trim().to_owned()))
        .labelled("action");

    let cost = just("cost")
        .padded()
        .ignore_then(just('='))
        .padded()
        .ignore_then(text::int(10))
        .try_map(|value: String, span| {
            value
                .parse::<u64>()
                .map_err(|err| Simple::custom(span, err.to_string()))
        })
        .then_ignore(any().repeated())
        .map(PlanLine::Cost)
        .labelled("cost");

    let comment = just(';')
        .ignore_then(cost.or(any().repeated().to(PlanLine::Comment)))
        .labelled("comment");

    action.or(comment).then_ignore(end())
}
