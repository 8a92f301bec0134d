//! Interactive uncertainty calculator
//!
//! Reads from stdin and writes prompts and results to stdout. Diagnostics go
//! through `tracing` to stderr.

use std::io::{self, BufRead, Write};

use tracing::{Level, warn};
use uncertainty_calc::{
    Assignment, DEFAULT_SIGNIFICANT_FIGURES, Measurement, Operation, combine_linear,
    combine_multiplicative, parse, propagate,
};

const RULE: &str = "========================================";

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(Level::WARN)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    Session::new(stdin.lock(), stdout.lock()).run()
}

/// Unwrap a prompt result, ending the current step when input is exhausted
macro_rules! or_eof {
    ($e:expr) => {
        match $e? {
            Some(value) => value,
            None => return Ok(None),
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    First,
    Second,
}

struct Session<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    fn new(input: R, output: W) -> Self {
        Session { input, output }
    }

    fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "Uncertainty Calculator")?;
        writeln!(self.output, "======================\n")?;
        // None means stdin closed: leave without the farewell
        self.main_menu().map(|_| ())
    }

    fn main_menu(&mut self) -> io::Result<Option<()>> {
        loop {
            writeln!(self.output, "Main Menu:")?;
            writeln!(self.output, "1) Equation Mode (enter any equation)")?;
            writeln!(self.output, "2) Values-Only Mode (addition or multiplication)")?;

            match or_eof!(self.choose("Choose mode (1 or 2): ")) {
                Choice::First => or_eof!(self.equation_mode()),
                Choice::Second => or_eof!(self.values_only_mode()),
            }

            if or_eof!(self.yes_no("\nReturn to main menu? (yes/no): ")) {
                writeln!(self.output, "\n{}\n", RULE)?;
            } else {
                writeln!(self.output, "Thank you for using Uncertainty Calculator. Goodbye!")?;
                return Ok(Some(()));
            }
        }
    }

    fn equation_mode(&mut self) -> io::Result<Option<()>> {
        loop {
            writeln!(self.output, "Enter your equation (use ^ for powers):")?;
            let raw = or_eof!(self.prompt("> "));
            let expr = match parse(raw.trim()) {
                Ok(expr) => expr,
                Err(e) => {
                    writeln!(self.output, "Error parsing equation: {}", e)?;
                    continue;
                }
            };

            let variables = expr.sorted_variables();
            if variables.is_empty() {
                match expr.evaluate(&Assignment::new()) {
                    Ok(value) => {
                        writeln!(self.output, "\nComputed value: {}", value)?;
                        writeln!(self.output, "Absolute uncertainty: 0 (No variables)")?;
                        writeln!(self.output, "Fractional uncertainty: 0")?;
                    }
                    Err(e) => self.report_failure(&e)?,
                }
            } else {
                writeln!(self.output, "\nDetected variables: {}", variables.join(", "))?;
                let mut assignment = Assignment::new();
                for var in &variables {
                    let measurement = or_eof!(self.read_measurement(var));
                    assignment.insert(var.as_str(), measurement);
                }

                match propagate(&expr, &assignment) {
                    Ok(result) => {
                        writeln!(self.output, "\n{}", result.rounded(DEFAULT_SIGNIFICANT_FIGURES))?
                    }
                    Err(e) => self.report_failure(&e)?,
                }
            }

            if !or_eof!(self.yes_no("\nDo you want another calculation in this mode? (yes/no): ")) {
                return Ok(Some(()));
            }
            writeln!(self.output, "\n{}\n", RULE)?;
        }
    }

    fn values_only_mode(&mut self) -> io::Result<Option<()>> {
        writeln!(self.output, "\nValues-Only Mode")?;
        writeln!(self.output, "1) Addition/Subtraction")?;
        writeln!(self.output, "2) Multiplication/Division")?;
        let choice = or_eof!(self.choose("Choose operation type (1 or 2): "));

        match choice {
            Choice::First => writeln!(self.output, "Enter your values (separated by spaces):")?,
            Choice::Second => writeln!(
                self.output,
                "Enter your values (separated by spaces, prefix divisors with /):"
            )?,
        }
        let (values, ops) = loop {
            let line = or_eof!(self.prompt("> "));
            let parsed = match choice {
                Choice::First => parse_numbers(&line).map(|v| (v, Vec::new())),
                Choice::Second => parse_factors(&line),
            };
            match parsed {
                Some((values, ops)) if !values.is_empty() => break (values, ops),
                _ => writeln!(self.output, "Please enter valid numbers separated by spaces.")?,
            }
        };

        writeln!(
            self.output,
            "Enter the uncertainties for each value ({} values):",
            values.len()
        )?;
        let uncertainties = loop {
            match parse_numbers(&or_eof!(self.prompt("> "))) {
                Some(u) if u.len() == values.len() => break u,
                Some(u) => writeln!(
                    self.output,
                    "Expected {} uncertainties, got {}. Try again.",
                    values.len(),
                    u.len()
                )?,
                None => writeln!(self.output, "Please enter valid numbers separated by spaces.")?,
            }
        };

        let (result, operation) = match choice {
            Choice::First => {
                let terms: Vec<_> = values.iter().map(f64::to_string).collect();
                (combine_linear(&values, &uncertainties), terms.join(" + "))
            }
            Choice::Second => (
                combine_multiplicative(&values, &uncertainties, &ops),
                describe_factors(&values, &ops),
            ),
        };

        match result {
            Ok(result) => {
                let result = result.rounded(DEFAULT_SIGNIFICANT_FIGURES);
                writeln!(self.output, "\nOperation: {} = {}", operation, result.value)?;
                writeln!(self.output, "{}", result)?;
            }
            Err(e) => self.report_failure(&e)?,
        }
        Ok(Some(()))
    }

    fn read_measurement(&mut self, var: &str) -> io::Result<Option<Measurement>> {
        loop {
            let value = or_eof!(self.prompt(&format!("Enter value for {}: ", var)));
            let uncertainty = or_eof!(self.prompt(&format!("Enter uncertainty for {}: ", var)));

            let (Ok(value), Ok(uncertainty)) =
                (value.trim().parse::<f64>(), uncertainty.trim().parse::<f64>())
            else {
                writeln!(self.output, "Invalid input. Please enter numeric values.")?;
                continue;
            };

            let measurement = Measurement::new(value, uncertainty);
            match measurement.validate(var) {
                Ok(()) => return Ok(Some(measurement)),
                Err(e) => writeln!(self.output, "{}. Please try again.", e)?,
            }
        }
    }

    fn report_failure(&mut self, error: &dyn std::error::Error) -> io::Result<()> {
        warn!(%error, "calculation failed");
        writeln!(self.output, "An error occurred during calculation: {}", error)
    }

    fn choose(&mut self, text: &str) -> io::Result<Option<Choice>> {
        loop {
            match or_eof!(self.prompt(text)).trim() {
                "1" => return Ok(Some(Choice::First)),
                "2" => return Ok(Some(Choice::Second)),
                _ => writeln!(self.output, "Invalid choice. Please enter 1 or 2.")?,
            }
        }
    }

    fn yes_no(&mut self, text: &str) -> io::Result<Option<bool>> {
        loop {
            match or_eof!(self.prompt(text)).trim().to_lowercase().as_str() {
                "yes" | "y" => return Ok(Some(true)),
                "no" | "n" => return Ok(Some(false)),
                _ => writeln!(self.output, "Please enter 'yes' or 'no'.")?,
            }
        }
    }

    /// Print `text` and read one line; `None` at end of input
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

fn parse_numbers(line: &str) -> Option<Vec<f64>> {
    line.split_whitespace().map(|t| t.parse().ok()).collect()
}

/// Split `100 /50 *2` into values and how each enters the product
fn parse_factors(line: &str) -> Option<(Vec<f64>, Vec<Operation>)> {
    line.split_whitespace()
        .map(|token| {
            let (op, number) = match token.strip_prefix('/') {
                Some(rest) => (Operation::Divide, rest),
                None => (Operation::Multiply, token.strip_prefix('*').unwrap_or(token)),
            };
            number.parse().ok().map(|value: f64| (value, op))
        })
        .collect::<Option<Vec<_>>>()
        .map(|factors| factors.into_iter().unzip())
}

fn describe_factors(values: &[f64], ops: &[Operation]) -> String {
    let mut text = String::new();
    for (i, (value, op)) in values.iter().zip(ops).enumerate() {
        match op {
            Operation::Multiply if i > 0 => text.push_str(" × "),
            Operation::Multiply => {}
            Operation::Divide if i > 0 => text.push_str(" ÷ "),
            Operation::Divide => text.push_str("1 ÷ "),
        }
        text.push_str(&value.to_string());
    }
    text
}
