//! The interactive main menu.

use crate::cli::prompt::{PromptError, Prompter};
use crate::error::{ErrorKind, WeatherTrendsError};
use crate::pipeline::{PlotOutcome, PlotRequest, WeatherTrends};
use crate::types::date_range::parse_date;
use crate::types::variable::{PlotMode, WeatherVariable};
use log::warn;
use std::io::{BufRead, Write};

const MAIN_MENU: &str = "
    1. Create Weather Plot
    2. Create Weather Trend
    3. Exit
";

const VARIABLE_MENU: &str = "
    1. Temperature
    2. Precipitation
    3. Dew Point
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Plot(PlotMode),
    Exit,
}

pub fn parse_menu_choice(answer: &str) -> Result<MenuChoice, String> {
    match answer.trim() {
        "1" => Ok(MenuChoice::Plot(PlotMode::Point)),
        "2" => Ok(MenuChoice::Plot(PlotMode::Trend)),
        "3" => Ok(MenuChoice::Exit),
        other => Err(format!("'{other}' is not one of 1, 2 or 3")),
    }
}

/// Accepts the menu number or the variable's name in any case.
pub fn parse_variable(answer: &str) -> Result<WeatherVariable, String> {
    let answer = answer.trim();
    if let Ok(n) = answer.parse::<usize>() {
        if let Some(variable) = n.checked_sub(1).and_then(|i| WeatherVariable::ALL.get(i)) {
            return Ok(*variable);
        }
    }
    WeatherVariable::ALL
        .iter()
        .find(|v| {
            v.display_name().eq_ignore_ascii_case(answer) || v.slug().eq_ignore_ascii_case(answer)
        })
        .copied()
        .ok_or_else(|| format!("'{answer}' is not a known variable"))
}

pub fn parse_non_empty(answer: &str) -> Result<String, String> {
    let answer = answer.trim();
    if answer.is_empty() {
        Err("A value is required".to_string())
    } else {
        Ok(answer.to_string())
    }
}

fn mode_header(mode: PlotMode) -> &'static str {
    match mode {
        PlotMode::Point => "_____  Weather Plot _______________________________",
        PlotMode::Trend => "_____ Weather Trend _______________________________",
    }
}

fn describe_failure(error: &WeatherTrendsError) -> String {
    match error.kind() {
        ErrorKind::InsufficientData => format!(
            "Not enough data for this plot: {error}. Try a wider date range."
        ),
        ErrorKind::Network => format!("Could not retrieve data: {error}"),
        ErrorKind::DataFormat => format!("The weather service sent unexpected data: {error}"),
        ErrorKind::InvalidDateRange => format!("Invalid date range: {error}"),
        ErrorKind::Cache => format!("Response cache failed: {error}"),
        ErrorKind::Render => format!("Could not draw the plot: {error}"),
        ErrorKind::Configuration => format!("Configuration problem: {error}"),
    }
}

fn describe_outcome(outcome: &PlotOutcome) -> String {
    let mut lines = vec![format!("Coordinates {}", outcome.location)];
    if let Some(elevation) = outcome.elevation {
        lines.push(format!("Elevation {elevation} m asl"));
    }
    if let Some(timezone) = &outcome.timezone {
        lines.push(format!(
            "Timezone {} ({} s from GMT)",
            timezone, outcome.utc_offset_seconds
        ));
    }
    lines.push(format!(
        "{} hourly samples, {} with data",
        outcome.samples, outcome.present_samples
    ));
    lines.push(format!("Plot written to {}", outcome.path.display()));
    lines.join("\n")
}

/// Shows the main menu until the user exits or input ends.
///
/// A question answered wrongly too often returns to the main menu. A failed plot is
/// reported and the menu is shown again.
///
/// `input` is read with blocking calls on the current task. Nothing else runs on the
/// runtime while the menu waits for an answer, so no other work is stalled.
pub async fn run_menu<R: BufRead, W: Write>(
    app: &WeatherTrends,
    input: R,
    output: W,
) -> Result<(), PromptError> {
    let mut prompter = Prompter::new(input, output);
    loop {
        prompter.say(MAIN_MENU)?;
        let choice = match prompter.ask_until_valid("    Enter a choice: ", parse_menu_choice) {
            Ok(choice) => choice,
            Err(PromptError::TooManyAttempts(_)) => continue,
            Err(PromptError::Eof) => return Ok(()),
            Err(e) => return Err(e),
        };
        let mode = match choice {
            MenuChoice::Exit => return Ok(()),
            MenuChoice::Plot(mode) => mode,
        };

        prompter.say(mode_header(mode))?;
        let request = match read_request(app, &mut prompter, mode) {
            Ok(request) => request,
            Err(PromptError::TooManyAttempts(_)) => {
                prompter.say("Returning to the main menu.")?;
                continue;
            }
            Err(PromptError::Eof) => return Ok(()),
            Err(e) => return Err(e),
        };

        match app.run(&request).await {
            Ok(outcome) => prompter.say(&describe_outcome(&outcome))?,
            Err(e) => {
                warn!("Plot request failed: {e:?}");
                prompter.say(&describe_failure(&e))?;
            }
        }
    }
}

fn read_request<R: BufRead, W: Write>(
    app: &WeatherTrends,
    prompter: &mut Prompter<R, W>,
    mode: PlotMode,
) -> Result<PlotRequest, PromptError> {
    prompter.say(VARIABLE_MENU)?;
    let variable = prompter.ask_until_valid("    Enter a variable: ", parse_variable)?;
    let city = prompter.ask_until_valid("Enter a city: ", parse_non_empty)?;
    let state = prompter.ask_until_valid("Enter a state: ", parse_non_empty)?;
    let start = prompter.ask_until_valid("Enter a start date (YYYY-MM-DD): ", |answer| {
        parse_date(answer).map_err(|e| e.to_string())
    })?;
    let range = prompter.ask_until_valid("Enter an end date (YYYY-MM-DD): ", |answer| {
        app.date_range(mode, &start.to_string(), answer)
            .map_err(|e| e.to_string())
    })?;

    Ok(PlotRequest {
        mode,
        variable,
        city,
        state,
        range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_choices() {
        assert_eq!(
            parse_menu_choice("1"),
            Ok(MenuChoice::Plot(PlotMode::Point))
        );
        assert_eq!(
            parse_menu_choice(" 2 "),
            Ok(MenuChoice::Plot(PlotMode::Trend))
        );
        assert_eq!(parse_menu_choice("3"), Ok(MenuChoice::Exit));
        assert!(parse_menu_choice("4").is_err());
        assert!(parse_menu_choice("").is_err());
    }

    #[test]
    fn test_variables() {
        assert_eq!(parse_variable("1"), Ok(WeatherVariable::Temperature));
        assert_eq!(parse_variable("3"), Ok(WeatherVariable::DewPoint));
        assert_eq!(parse_variable("precipitation"), Ok(WeatherVariable::Precipitation));
        assert_eq!(parse_variable("Dew Point"), Ok(WeatherVariable::DewPoint));
        assert!(parse_variable("0").is_err());
        assert!(parse_variable("humidity").is_err());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(parse_non_empty("  Provo "), Ok("Provo".to_string()));
        assert!(parse_non_empty("   ").is_err());
    }

    #[test]
    fn test_insufficient_data_hint() {
        let error: WeatherTrendsError = crate::series::error::SeriesError::InsufficientData {
            required: 14,
            actual: 2,
        }
        .into();
        assert!(describe_failure(&error).contains("wider date range"));
    }
}
