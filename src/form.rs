//! Terminal rendition of the TDEE form
//!
//! `FormState` holds the values being edited and the outcome of the last
//! calculation. `FormSession` drives it from line-oriented input, one command
//! per line.

use std::fmt::Write as _;
use std::io::{BufRead, Write};
use std::str::FromStr;

use tracing::info;

use crate::config::FormDefaults;
use crate::error::{Result, TdeeError, ValidationError};
use crate::estimator::TdeeEstimator;
use crate::export::text::render_result;
use crate::models::{ActivityLevel, EstimationResult, Gender, Goal};
use crate::validation::{accept_numeric_entry, FormFields, FormMode, InputValidator};

/// Numeric form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Weight,
    Height,
    Age,
    BodyFat,
}

/// Controls shown on the form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormControl {
    Weight,
    Height,
    Age,
    BodyFat,
    Gender,
    ActivityLevel,
    Goal,
}

/// State of one form: field values plus the last calculation outcome
#[derive(Debug, Clone)]
pub struct FormState {
    fields: FormFields,
    result: Option<EstimationResult>,
    error: Option<ValidationError>,
}

impl FormState {
    pub fn new(defaults: &FormDefaults) -> Self {
        FormState {
            fields: defaults.to_fields(),
            result: None,
            error: None,
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Last successful estimate
    pub fn result(&self) -> Option<&EstimationResult> {
        self.result.as_ref()
    }

    /// Error from the last calculate action, cleared on the next one
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    pub fn mode(&self) -> FormMode {
        self.fields.mode()
    }

    /// Edit a numeric field; entries that are not non-negative numbers are
    /// ignored and the previous value is kept. Returns whether the entry was
    /// accepted.
    pub fn set_numeric(&mut self, field: NumericField, value: &str) -> bool {
        if !accept_numeric_entry(value) {
            return false;
        }

        let value = value.trim().to_string();
        match field {
            NumericField::Weight => self.fields.weight = value,
            NumericField::Height => self.fields.height = value,
            NumericField::Age => self.fields.age = value,
            NumericField::BodyFat => self.fields.body_fat = value,
        }
        true
    }

    /// Switch weight entry between kg and lbs; the entered number is kept
    pub fn toggle_weight_unit(&mut self) {
        self.fields.weight_unit = self.fields.weight_unit.toggled();
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.fields.gender = Some(gender);
    }

    pub fn set_activity_level(&mut self, activity_level: ActivityLevel) {
        self.fields.activity_level = Some(activity_level);
    }

    pub fn set_goal(&mut self, goal: Goal) {
        self.fields.goal = Some(goal);
    }

    /// Controls visible in the current mode
    pub fn visible_controls(&self) -> Vec<FormControl> {
        let standard = self.mode() == FormMode::Standard;
        let mut controls = vec![FormControl::Weight];
        if standard {
            controls.extend([FormControl::Height, FormControl::Age]);
        }
        controls.push(FormControl::BodyFat);
        if standard {
            controls.push(FormControl::Gender);
        }
        controls.extend([FormControl::ActivityLevel, FormControl::Goal]);
        controls
    }

    /// Validate and estimate.
    ///
    /// On failure the previous result is left in place and the error is
    /// recorded for display.
    pub fn calculate(&mut self) -> std::result::Result<EstimationResult, ValidationError> {
        self.error = None;

        match InputValidator::validate(&self.fields) {
            Ok(validated) => {
                let result =
                    TdeeEstimator::estimate(&validated.input, validated.activity_level, validated.goal);
                info!(
                    bmr = result.bmr,
                    total_energy = result.total_energy,
                    formula = %result.formula,
                    activity = validated.activity_level.key(),
                    goal = validated.goal.key(),
                    "Calculated TDEE"
                );
                self.result = Some(result);
                Ok(result)
            }
            Err(err) => {
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Plain-text rendering of the form
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "TDEE Calculator");

        for control in self.visible_controls() {
            let line = match control {
                FormControl::Weight => format!(
                    "Weight ({}): {}",
                    self.fields.weight_unit.label(),
                    self.fields.weight
                ),
                FormControl::Height => format!("Height (cm): {}", self.fields.height),
                FormControl::Age => format!("Age (years): {}", self.fields.age),
                FormControl::BodyFat => format!("Body Fat % (optional): {}", self.fields.body_fat),
                FormControl::Gender => format!(
                    "Gender: {}",
                    Gender::ALL
                        .iter()
                        .map(|g| selected(g.label(), self.fields.gender == Some(*g)))
                        .collect::<Vec<_>>()
                        .join(" ")
                ),
                FormControl::ActivityLevel => format!(
                    "Activity Level: {}",
                    self.fields
                        .activity_level
                        .map(|a| a.label())
                        .unwrap_or_default()
                ),
                FormControl::Goal => format!(
                    "Goal: {}",
                    self.fields.goal.map(|g| g.label()).unwrap_or_default()
                ),
            };
            let _ = writeln!(out, "  {}", line);
        }

        if let Some(err) = &self.error {
            let _ = writeln!(out, "{}", err.prompt());
        }
        if let Some(result) = &self.result {
            let _ = writeln!(out, "{}", render_result(result));
        }

        out
    }
}

fn selected(label: &str, is_selected: bool) -> String {
    if is_selected {
        format!("[{}]", label)
    } else {
        label.to_string()
    }
}

/// One line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum FormCommand {
    Set(NumericField, String),
    ToggleUnit,
    Gender(Gender),
    Activity(ActivityLevel),
    Goal(Goal),
    Calculate,
    Show,
    Help,
    Quit,
}

impl FormCommand {
    /// Parse a command line such as `weight 80` or `goal fat loss`
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim();
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        let numeric = |field: NumericField| FormCommand::Set(field, arg.to_string());
        let command = match name.to_lowercase().as_str() {
            "weight" => numeric(NumericField::Weight),
            "height" => numeric(NumericField::Height),
            "age" => numeric(NumericField::Age),
            "bodyfat" | "body_fat" | "bf" => numeric(NumericField::BodyFat),
            "unit" | "toggle" => FormCommand::ToggleUnit,
            "gender" => FormCommand::Gender(parse_selection(arg)?),
            "activity" => FormCommand::Activity(parse_selection(arg)?),
            "goal" => FormCommand::Goal(parse_selection(arg)?),
            "calc" | "calculate" => FormCommand::Calculate,
            "show" | "" => FormCommand::Show,
            "help" | "?" => FormCommand::Help,
            "quit" | "exit" | "q" => FormCommand::Quit,
            other => return Err(format!("Unknown command: {}", other)),
        };

        Ok(command)
    }
}

fn parse_selection<T: FromStr<Err = TdeeError>>(arg: &str) -> std::result::Result<T, String> {
    arg.parse().map_err(|e: TdeeError| e.user_message())
}

const HELP: &str = "\
Commands:
  weight <n>      set weight in the current unit
  unit            toggle weight unit between kg and lbs
  height <n>      set height in cm
  age <n>         set age in years
  bodyfat <n>     set body fat %, empty to clear
  gender <male|female>
  activity <sedentary|light|moderate|heavy|athlete>
  goal <maintenance|fat_loss|muscle_gain>
  calc            calculate TDEE
  show            redraw the form
  quit";

/// Interactive form driven by line input
pub struct FormSession<R, W> {
    state: FormState,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> FormSession<R, W> {
    pub fn new(state: FormState, input: R, output: W) -> Self {
        FormSession {
            state,
            input,
            output,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Run until `quit` or end of input
    pub fn run(&mut self) -> Result<()> {
        write!(self.output, "{}", self.state.render())?;
        writeln!(self.output, "Type 'help' for commands.")?;

        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }

            match FormCommand::parse(&line) {
                Ok(FormCommand::Quit) => break,
                Ok(command) => self.apply(command)?,
                Err(message) => writeln!(self.output, "{}", message)?,
            }
        }

        Ok(())
    }

    fn apply(&mut self, command: FormCommand) -> Result<()> {
        match command {
            FormCommand::Set(field, value) => {
                if !self.state.set_numeric(field, &value) {
                    writeln!(self.output, "Ignored '{}': enter a non-negative number", value)?;
                    return Ok(());
                }
                // Body fat can show or hide fields
                if field == NumericField::BodyFat {
                    write!(self.output, "{}", self.state.render())?;
                }
            }
            FormCommand::ToggleUnit => {
                self.state.toggle_weight_unit();
                writeln!(
                    self.output,
                    "Weight unit: {}",
                    self.state.fields().weight_unit.label()
                )?;
            }
            FormCommand::Gender(gender) => self.state.set_gender(gender),
            FormCommand::Activity(level) => self.state.set_activity_level(level),
            FormCommand::Goal(goal) => self.state.set_goal(goal),
            FormCommand::Calculate => match self.state.calculate() {
                Ok(result) => writeln!(self.output, "{}", render_result(&result))?,
                Err(err) => writeln!(self.output, "{}", err.prompt())?,
            },
            FormCommand::Show => write!(self.output, "{}", self.state.render())?,
            FormCommand::Help => writeln!(self.output, "{}", HELP)?,
            FormCommand::Quit => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeightUnit;

    fn default_state() -> FormState {
        FormState::new(&FormDefaults::default())
    }

    #[test]
    fn test_entry_filter_keeps_previous_value() {
        let mut state = default_state();

        assert!(!state.set_numeric(NumericField::Weight, "-80"));
        assert!(!state.set_numeric(NumericField::Weight, "heavy"));
        assert_eq!(state.fields().weight, "70");

        assert!(state.set_numeric(NumericField::Weight, "82.5"));
        assert_eq!(state.fields().weight, "82.5");
    }

    #[test]
    fn test_body_fat_hides_standard_controls() {
        let mut state = default_state();
        assert_eq!(state.visible_controls().len(), 7);

        state.set_numeric(NumericField::BodyFat, "20");
        assert_eq!(
            state.visible_controls(),
            vec![
                FormControl::Weight,
                FormControl::BodyFat,
                FormControl::ActivityLevel,
                FormControl::Goal
            ]
        );

        state.set_numeric(NumericField::BodyFat, "");
        assert!(state.visible_controls().contains(&FormControl::Height));
    }

    #[test]
    fn test_failed_calculation_keeps_last_result() {
        let mut state = default_state();
        state.calculate().unwrap();

        state.set_numeric(NumericField::Weight, "");
        let err = state.calculate().unwrap_err();

        assert_eq!(err.prompt(), "Please enter: Weight");
        assert!(state.result().is_some());
        assert!(state.render().contains("Please enter: Weight"));
    }

    #[test]
    fn test_toggle_keeps_entered_number() {
        let mut state = default_state();
        state.toggle_weight_unit();

        assert_eq!(state.fields().weight_unit, WeightUnit::Pounds);
        assert_eq!(state.fields().weight, "70");
        assert!(state.render().contains("Weight (lbs): 70"));
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(
            FormCommand::parse("weight 80").unwrap(),
            FormCommand::Set(NumericField::Weight, "80".to_string())
        );
        assert_eq!(
            FormCommand::parse("bodyfat").unwrap(),
            FormCommand::Set(NumericField::BodyFat, String::new())
        );
        assert_eq!(FormCommand::parse("goal fat loss").unwrap(), FormCommand::Goal(Goal::FatLoss));
        assert_eq!(FormCommand::parse("  ").unwrap(), FormCommand::Show);
        assert!(FormCommand::parse("activity couch").is_err());
        assert!(FormCommand::parse("jump").is_err());
    }

    #[test]
    fn test_session_calculates_from_commands() {
        let input = "gender female\nactivity moderate\ncalc\nquit\n";
        let mut output = Vec::new();

        let mut session = FormSession::new(default_state(), input.as_bytes(), &mut output);
        session.run().unwrap();
        let result = *session.state().result().unwrap();

        // 10*70 + 6.25*175 - 5*25 - 161 = 1507.75
        assert!((result.total_energy - 1507.75 * 1.55).abs() < 1e-9);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("TDEE: 2337.01 kcal/day"));
    }
}
