//! Text menu over the calculators, generic over its input and output so it can be driven from
//! a terminal or from a test.
use crate::Utils::config::AppConfig;
use crate::Utils::plots::Plotter;
use crate::calculus::analysis::{AnalysisFacade, AsymptoteReport, ConcavityReport, DomainRange, Extrema};
use crate::calculus::basic_calc::BasicCalculator;
use crate::calculus::derivative::{derivative_label, differentiate};
use crate::calculus::function::{DECIMALS, ScalarExpression, parse_constant};
use crate::calculus::intervals::{ClassificationMap, Interval};
use crate::error::{CalcError, CalcResult};
use crate::symbolic::symbolic_engine::format_number;
use crate::symbolic::utils::round_to;
use itertools::Itertools;
use log::{debug, info};
use regex::Regex;
use std::fmt;
use std::io::{BufRead, Write};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

const BANNER: &str = "\t\t**DerivativeXpert**\n
DerivativeXpert:
      is the ultimate tool for basic and advanced calculus,
      including plotting, derivatives, limits, and more.";

/// Entries of the advanced calculator menu, numbered from 1 in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum AdvancedAction {
    #[strum(to_string = "Evaluate the function")]
    Evaluate,
    #[strum(to_string = "Differentiate")]
    Differentiate,
    #[strum(to_string = "Plot the function")]
    Plot,
    #[strum(to_string = "Plot a derivative")]
    PlotDerivative,
    #[strum(to_string = "Slope at a point")]
    Slope,
    #[strum(to_string = "Critical points")]
    CriticalPoints,
    #[strum(to_string = "Intervals of increase and decrease")]
    Monotonicity,
    #[strum(to_string = "Inflection points")]
    InflectionPoints,
    #[strum(to_string = "Concavity")]
    Concavity,
    #[strum(to_string = "Asymptotes")]
    Asymptotes,
    #[strum(to_string = "Domain and range")]
    DomainRange,
    #[strum(to_string = "Extrema on an interval")]
    Extrema,
    #[strum(to_string = "Enter a new function")]
    NewFunction,
}

impl AdvancedAction {
    /// Menu entry for the number typed by the user.
    pub fn from_choice(choice: &str) -> CalcResult<Self> {
        let invalid = || CalcError::InvalidInput(format!("'{}' is not a menu option", choice.trim()));
        let n: usize = choice.trim().parse().map_err(|_| invalid())?;
        Self::iter().nth(n.wrapping_sub(1)).ok_or_else(invalid)
    }
}

//___________________________________FORMATTING___________________________________

/// A number for display: named when it is a multiple of pi or `E`, else rounded to 3 decimals.
pub fn display_value(v: f64) -> String {
    let named = format_number(v).0;
    if !v.is_finite() || v.fract() == 0.0 || named.contains("pi") || named.ends_with('E') {
        named
    } else {
        format_number(round_to(v, DECIMALS)).0
    }
}

pub fn display_points(points: &[f64]) -> String {
    if points.is_empty() {
        "none".to_string()
    } else {
        format!("{{{}}}", points.iter().map(|p| display_value(*p)).join(", "))
    }
}

pub fn display_interval(interval: &Interval) -> String {
    format!(
        "[{}, {}]",
        display_value(interval.start),
        display_value(interval.end)
    )
}

/// One row per label with its intervals, as a table.
pub fn classification_table<L>(map: &ClassificationMap<L>) -> String
where
    L: Ord + Copy + fmt::Display + IntoEnumIterator,
{
    let mut builder = tabled::builder::Builder::default();
    builder.push_record(["Behaviour".to_string(), "Intervals".to_string()]);
    for (label, intervals) in map.iter() {
        let cells = if intervals.is_empty() {
            "-".to_string()
        } else {
            intervals.iter().map(display_interval).join(" U ")
        };
        builder.push_record([label.to_string(), cells]);
    }
    let mut table = builder.build();
    table.with(tabled::settings::Style::modern_rounded());
    table.to_string()
}

fn parse_endpoint(text: &str) -> CalcResult<f64> {
    match text.trim() {
        "oo" | "+oo" | "inf" | "+inf" | "infinity" => Ok(f64::INFINITY),
        "-oo" | "-inf" | "-infinity" => Ok(f64::NEG_INFINITY),
        other => parse_constant(other).map_err(|e| CalcError::InvalidInput(e.to_string())),
    }
}

/// Splits at the single comma outside parentheses, so `[log(8, 2), 5]` has two ends.
fn split_ends(body: &str) -> Option<(&str, &str)> {
    let mut depth = 0i32;
    let mut split = None;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                if split.is_some() {
                    return None;
                }
                split = Some(i);
            }
            _ => {}
        }
    }
    split.map(|i| (&body[..i], &body[i + 1..]))
}

/// Parses `[a, b]` or `a, b`; the ends may be expressions like `2*pi`, or `oo`/`-oo`.
/// Empty text means "no interval".
pub fn parse_interval(text: &str) -> CalcResult<Option<Interval>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let not_an_interval =
        || CalcError::InvalidInput(format!("'{}' is not an interval like [a, b]", text.trim()));
    let brackets = Regex::new(r"^\s*\[(.*)\]\s*$").map_err(|e| CalcError::InvalidInput(e.to_string()))?;
    let body = match brackets.captures(text) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None => text,
    };
    let (a, b) = split_ends(body).ok_or_else(not_an_interval)?;
    if a.trim().is_empty() || b.trim().is_empty() {
        return Err(not_an_interval());
    }
    let start = parse_endpoint(a)?;
    let end = parse_endpoint(b)?;
    if !(start < end) {
        return Err(CalcError::InvalidInput(format!(
            "the interval start must be below its end, got [{}, {}]",
            display_value(start),
            display_value(end)
        )));
    }
    Ok(Some(Interval::new(start, end)))
}

fn parse_order(text: &str) -> CalcResult<usize> {
    text.trim()
        .parse::<usize>()
        .map_err(|_| CalcError::InvalidInput(format!("'{}' is not a derivative order", text.trim())))
}

//___________________________________SHELL___________________________________

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Back,
    Exit,
}

/// What one advanced menu action produced.
#[derive(Debug, Clone, PartialEq)]
enum Reply {
    Text(String),
    /// `m` typed at the argument prompt
    Cancelled,
    EndOfInput,
}

pub struct InteractiveShell<R: BufRead, W: Write> {
    input: R,
    output: W,
    analysis: AnalysisFacade,
    plotter: Plotter,
    domain_check: bool,
    function: Option<ScalarExpression>,
}

impl<R: BufRead, W: Write> InteractiveShell<R, W> {
    pub fn new(input: R, output: W, config: &AppConfig) -> Self {
        Self {
            input,
            output,
            analysis: AnalysisFacade::with_config(config.analysis_config()),
            plotter: Plotter::from_settings(&config.plot),
            domain_check: config.analysis.domain_check,
            function: None,
        }
    }

    /// the function currently loaded in the advanced calculator
    pub fn function(&self) -> Option<&ScalarExpression> {
        self.function.as_ref()
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// `None` at end of input
    fn read_line(&mut self, prompt: &str) -> CalcResult<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// One argument line for a menu action; `m` cancels the action.
    fn read_argument(&mut self, prompt: &str) -> CalcResult<Reply> {
        Ok(match self.read_line(prompt)? {
            None => Reply::EndOfInput,
            Some(text) if text == "m" => Reply::Cancelled,
            Some(text) => Reply::Text(text),
        })
    }

    fn print_error(&mut self, err: &CalcError) -> CalcResult<()> {
        debug!("shell error: {:?}", err);
        writeln!(self.output, "Error: {}", err)?;
        Ok(())
    }

    /// Runs the top menu until the user exits or the input ends.
    pub fn run(&mut self) -> CalcResult<()> {
        writeln!(self.output, "{}", BANNER)?;
        loop {
            writeln!(
                self.output,
                "\nDerivativeXpert is a command-line tool that provides the following features:"
            )?;
            writeln!(self.output, "\n1. Basic Calculator: Perform basic arithmetic operations.")?;
            writeln!(self.output, "2. Advanced Calculator: Perform advanced calculus operations.")?;
            writeln!(self.output, "3. Exit: Exit the program.")?;
            let Some(choice) = self.read_line("\nChoose the calculator: 1/2/3: ")? else {
                return Ok(());
            };
            let flow = match choice.as_str() {
                "1" => self.basic_mode()?,
                "2" => self.advanced_mode()?,
                "3" => Flow::Exit,
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    Flow::Back
                }
            };
            if flow == Flow::Exit {
                writeln!(self.output, "Exiting DerivativeXpert...")?;
                info!("shell finished");
                return Ok(());
            }
        }
    }

    fn basic_mode(&mut self) -> CalcResult<Flow> {
        writeln!(self.output, "\nBasic Calculator (m: main menu)")?;
        loop {
            let Some(text) = self.read_line("Enter an expression: ")? else {
                return Ok(Flow::Exit);
            };
            match text.as_str() {
                "m" => return Ok(Flow::Back),
                "" => continue,
                _ => match BasicCalculator::new(&text) {
                    Ok(calc) => {
                        let value = calc.evaluate_expression();
                        writeln!(self.output, "Result: {}", format_number(value).0)?;
                    }
                    Err(e) => self.print_error(&e)?,
                },
            }
        }
    }

    /// Asks for a function until a valid one is entered; `Some(flow)` when the user leaves instead.
    fn read_function(&mut self) -> CalcResult<Option<Flow>> {
        loop {
            let Some(text) = self.read_line("Enter a function of one variable: ")? else {
                return Ok(Some(Flow::Exit));
            };
            match text.as_str() {
                "m" => return Ok(Some(Flow::Back)),
                "" => continue,
                _ => match ScalarExpression::create(&text) {
                    Ok(f) => {
                        let f = f.with_domain_check(self.domain_check);
                        writeln!(self.output, "f({}) = {}", f.variable_or_default(), f)?;
                        self.function = Some(f);
                        return Ok(None);
                    }
                    Err(e) => self.print_error(&e)?,
                },
            }
        }
    }

    fn advanced_mode(&mut self) -> CalcResult<Flow> {
        writeln!(self.output, "\nAdvanced Calculator (m: main menu)")?;
        if self.function.is_none() {
            if let Some(flow) = self.read_function()? {
                return Ok(flow);
            }
        }
        loop {
            writeln!(self.output)?;
            for (i, action) in AdvancedAction::iter().enumerate() {
                writeln!(self.output, "{}. {}", i + 1, action)?;
            }
            let Some(choice) = self.read_line("Choose an option (m: main menu): ")? else {
                return Ok(Flow::Exit);
            };
            if choice == "m" {
                return Ok(Flow::Back);
            }
            let result = AdvancedAction::from_choice(&choice).and_then(|action| self.dispatch(action));
            match result {
                Ok(Reply::Text(text)) => writeln!(self.output, "{}", text)?,
                Ok(Reply::Cancelled) => continue,
                Ok(Reply::EndOfInput) => return Ok(Flow::Exit),
                Err(e) => self.print_error(&e)?,
            }
        }
    }

    fn current(&self) -> CalcResult<&ScalarExpression> {
        self.function.as_ref().ok_or(CalcError::NoFunction)
    }

    /// Runs one menu action.
    fn dispatch(&mut self, action: AdvancedAction) -> CalcResult<Reply> {
        debug!("menu action {:?}", action);
        let text = match action {
            AdvancedAction::Evaluate => {
                let value = match self.read_argument("Enter a value: ")? {
                    Reply::Text(value) => value,
                    other => return Ok(other),
                };
                let f = self.current()?;
                let result = f.evaluate(&value)?;
                format!("f({}) = {}", value, format_number(result).0)
            }
            AdvancedAction::Differentiate => {
                let order = match self.read_argument("Enter the order of the derivative: ")? {
                    Reply::Text(order) => parse_order(&order)?,
                    other => return Ok(other),
                };
                let derivative = differentiate(self.current()?, order);
                format!(
                    "{}({}) = {}",
                    derivative_label(order),
                    derivative.variable_or_default(),
                    derivative
                )
            }
            AdvancedAction::Plot => self.plot_message(self.plotter.plot(self.function.as_ref())?),
            AdvancedAction::PlotDerivative => {
                let order = match self.read_argument("Enter the order of the derivative: ")? {
                    Reply::Text(order) => parse_order(&order)?,
                    other => return Ok(other),
                };
                self.plot_message(self.plotter.plot_derivative(self.function.as_ref(), order)?)
            }
            AdvancedAction::Slope => {
                let value = match self.read_argument("Enter a value: ")? {
                    Reply::Text(value) => value,
                    other => return Ok(other),
                };
                let slope = self.analysis.slope(self.current()?, &value)?;
                format!("Slope at {} = {}: {}", self.current()?.variable_or_default(), value, format_number(slope).0)
            }
            AdvancedAction::CriticalPoints
            | AdvancedAction::InflectionPoints
            | AdvancedAction::Monotonicity
            | AdvancedAction::Concavity => {
                let interval =
                    match self.read_argument("Enter an interval [a, b] (empty: whole domain): ")? {
                        Reply::Text(text) => parse_interval(&text)?,
                        other => return Ok(other),
                    };
                interval_query(&self.analysis, self.current()?, action, interval)
            }
            AdvancedAction::Asymptotes => asymptote_text(&self.analysis, self.current()?),
            AdvancedAction::DomainRange => domain_range_text(&self.analysis, self.current()?),
            AdvancedAction::Extrema => {
                let interval = match self.read_argument("Enter an interval [a, b]: ")? {
                    Reply::Text(text) => parse_interval(&text)?.ok_or_else(|| {
                        CalcError::InvalidInput("extrema need an interval".to_string())
                    })?,
                    other => return Ok(other),
                };
                let Extrema { max, min } = self.analysis.extrema(self.current()?, interval)?;
                format!(
                    "On {}: max = {}, min = {}",
                    display_interval(&interval),
                    display_value(max),
                    display_value(min)
                )
            }
            AdvancedAction::NewFunction => {
                let text = match self.read_argument("Enter a function of one variable: ")? {
                    Reply::Text(text) => text,
                    other => return Ok(other),
                };
                let f = ScalarExpression::create(&text)?.with_domain_check(self.domain_check);
                let message = format!("f({}) = {}", f.variable_or_default(), f);
                self.function = Some(f);
                message
            }
        };
        Ok(Reply::Text(text))
    }

    fn plot_message(&self, written: Option<std::path::PathBuf>) -> String {
        match written {
            Some(path) => format!("Plot saved to {}", path.display()),
            None => format!("Plot shown with {}", self.plotter.backend_name()),
        }
    }
}

//___________________________________REPORTS___________________________________

fn interval_query(
    analysis: &AnalysisFacade,
    f: &ScalarExpression,
    action: AdvancedAction,
    interval: Option<Interval>,
) -> String {
    match action {
        AdvancedAction::CriticalPoints => {
            format!("Critical points: {}", display_points(&analysis.critical_points(f, interval)))
        }
        AdvancedAction::InflectionPoints => format!(
            "Inflection points: {}",
            display_points(&analysis.inflection_points(f, interval))
        ),
        AdvancedAction::Monotonicity => {
            classification_table(&analysis.intervals_of_increase_decreasing(f, interval))
        }
        _ => match analysis.concavity(f, interval) {
            ConcavityReport::ConstantFunction => "Constant function".to_string(),
            ConcavityReport::Map(map) => classification_table(&map),
        },
    }
}

fn domain_range_text(analysis: &AnalysisFacade, f: &ScalarExpression) -> String {
    let DomainRange { domain, range } = analysis.domain_and_range(f);
    let domain = if domain.is_empty() {
        "empty".to_string()
    } else {
        domain.iter().map(display_interval).join(" U ")
    };
    let range = range
        .map(|r| display_interval(&r))
        .unwrap_or_else(|| "empty".to_string());
    format!("Domain: {}\nRange: {}", domain, range)
}

fn asymptote_text(analysis: &AnalysisFacade, f: &ScalarExpression) -> String {
    match analysis.asymptotes(f) {
        AsymptoteReport::NoAsymptotes => "No asymptotes: the function is constant".to_string(),
        AsymptoteReport::Found { vertical, horizontal } => {
            let var = f.variable_or_default();
            let mut lines = Vec::new();
            if vertical.is_empty() {
                lines.push("Vertical asymptotes: none".to_string());
            } else {
                let mut builder = tabled::builder::Builder::default();
                builder.push_record([
                    format!("{} =", var),
                    format!("{} -> a-", var),
                    format!("{} -> a+", var),
                ]);
                for v in &vertical {
                    builder.push_record([display_value(v.at), v.left.to_string(), v.right.to_string()]);
                }
                let mut table = builder.build();
                table.with(tabled::settings::Style::modern_rounded());
                lines.push(format!("Vertical asymptotes:\n{}", table));
            }
            lines.push(format!(
                "Horizontal: {} -> oo: {}, {} -> -oo: {}",
                var, horizontal.at_pos_infinity, var, horizontal.at_neg_infinity
            ));
            lines.join("\n")
        }
    }
}

/// Full non-interactive report on `f`: derivative, critical and inflection points,
/// monotonicity, concavity, asymptotes, domain and range.
pub fn analysis_report(
    analysis: &AnalysisFacade,
    f: &ScalarExpression,
    interval: Option<Interval>,
) -> String {
    let var = f.variable_or_default();
    let mut sections = vec![
        format!("f({}) = {}", var, f),
        format!("f'({}) = {}", var, differentiate(f, 1)),
    ];
    for action in [
        AdvancedAction::CriticalPoints,
        AdvancedAction::InflectionPoints,
        AdvancedAction::Monotonicity,
        AdvancedAction::Concavity,
    ] {
        sections.push(interval_query(analysis, f, action, interval));
    }
    sections.push(asymptote_text(analysis, f));
    sections.push(domain_range_text(analysis, f));
    sections.join("\n")
}
