//! 2-D line charts of a function of one variable.
//!
//! The function is sampled over a fixed window; samples where it is undefined are dropped and
//! split the curve into separate segments. Rendering goes through a [`PlotBackend`]:
//! `plotters` (PNG file) or `gnuplot` (PNG file or interactive window).
use crate::Utils::config::PlotSettings;
use crate::calculus::derivative::{derivative_label, differentiate};
use crate::calculus::function::ScalarExpression;
use crate::error::{CalcError, CalcResult};
use crate::symbolic::utils::linspace;
use enum_dispatch::enum_dispatch;
use log::{info, warn};
use plotters::prelude::*;
use std::ops::Range;
use std::path::PathBuf;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BackendKind {
    Plotters,
    Gnuplot,
}

/// Everything a backend needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub caption: String,
    /// continuous pieces of the curve
    pub segments: Vec<Vec<(f64, f64)>>,
    /// file name without extension
    pub file_stem: String,
}

impl PlotData {
    /// x and y ranges covering every point, padded when flat
    pub fn bounds(&self) -> Option<(Range<f64>, Range<f64>)> {
        let points = self.segments.iter().flatten();
        let mut x = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y = (f64::INFINITY, f64::NEG_INFINITY);
        for (px, py) in points {
            x = (x.0.min(*px), x.1.max(*px));
            y = (y.0.min(*py), y.1.max(*py));
        }
        if !(x.0 <= x.1) {
            return None;
        }
        if x.0 == x.1 {
            x = (x.0 - 1.0, x.1 + 1.0);
        }
        if y.0 == y.1 {
            y = (y.0 - 1.0, y.1 + 1.0);
        }
        Some((x.0..x.1, y.0..y.1))
    }
}

/// Splits sampled points into runs of finite values.
pub fn split_into_segments(xs: &[f64], ys: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (x, y) in xs.iter().zip(ys.iter()) {
        if y.is_finite() {
            current.push((*x, *y));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn file_stem_for(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("plot_{}", cleaned.trim_matches('_'))
}

fn plot_err<E: std::fmt::Display>(e: E) -> CalcError {
    CalcError::Plot(e.to_string())
}

#[enum_dispatch]
pub trait PlotBackend {
    /// Draws the chart; returns the written file, if any.
    fn render(&self, data: &PlotData) -> CalcResult<Option<PathBuf>>;

    fn name(&self) -> &'static str;
}

/// PNG files through `plotters`.
#[derive(Debug, Clone)]
pub struct PlottersBackend {
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl PlotBackend for PlottersBackend {
    fn render(&self, data: &PlotData) -> CalcResult<Option<PathBuf>> {
        let (x_range, y_range) = data
            .bounds()
            .ok_or_else(|| CalcError::Plot(format!("nothing to draw for {}", data.title)))?;
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(format!("{}.png", data.file_stem));
        {
            let root_area = BitMapBackend::new(&path, (self.width, self.height)).into_drawing_area();
            root_area.fill(&WHITE).map_err(plot_err)?;

            // Create a chart builder
            let mut chart = ChartBuilder::on(&root_area)
                .caption(&data.title, ("sans-serif", 30))
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(60)
                .build_cartesian_2d(x_range, y_range)
                .map_err(plot_err)?;

            // Configure the mesh
            chart
                .configure_mesh()
                .x_desc(data.x_label.as_str())
                .y_desc(data.y_label.as_str())
                .draw()
                .map_err(plot_err)?;

            for (i, segment) in data.segments.iter().enumerate() {
                let series = chart
                    .draw_series(LineSeries::new(segment.iter().copied(), &BLUE))
                    .map_err(plot_err)?;
                if i == 0 {
                    series
                        .label(data.caption.as_str())
                        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
                }
            }

            // Configure the legend
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(plot_err)?;
            root_area.present().map_err(plot_err)?;
        }
        Ok(Some(path))
    }

    fn name(&self) -> &'static str {
        "plotters"
    }
}

/// gnuplot: saves a PNG when `output_dir` is set, otherwise opens a window.
#[derive(Debug, Clone)]
pub struct GnuplotBackend {
    pub output_dir: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
}

impl PlotBackend for GnuplotBackend {
    fn render(&self, data: &PlotData) -> CalcResult<Option<PathBuf>> {
        // gnuplot's Color option would shadow the plotters Color trait at module level
        use gnuplot::{AxesCommon, Caption, Color, Figure};
        if data.segments.is_empty() {
            return Err(CalcError::Plot(format!("nothing to draw for {}", data.title)));
        }
        let mut fg = Figure::new();
        {
            let axes = fg
                .axes2d()
                .set_title(&data.title, &[])
                .set_x_label(&data.x_label, &[])
                .set_y_label(&data.y_label, &[]);
            for (i, segment) in data.segments.iter().enumerate() {
                let xs: Vec<f64> = segment.iter().map(|p| p.0).collect();
                let ys: Vec<f64> = segment.iter().map(|p| p.1).collect();
                if i == 0 {
                    axes.lines(
                        &xs,
                        &ys,
                        &[Caption(data.caption.as_str()), Color("blue".into())],
                    );
                } else {
                    axes.lines(&xs, &ys, &[Color("blue".into())]);
                }
            }
        }
        match &self.output_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                let path = dir.join(format!("{}.png", data.file_stem));
                fg.save_to_png(&path, self.width, self.height)
                    .map_err(plot_err)?;
                Ok(Some(path))
            }
            None => {
                fg.show().map_err(plot_err)?;
                Ok(None)
            }
        }
    }

    fn name(&self) -> &'static str {
        "gnuplot"
    }
}

#[enum_dispatch(PlotBackend)]
#[derive(Debug, Clone)]
pub enum Backend {
    PlottersBackend,
    GnuplotBackend,
}

/// Samples functions over a fixed window and hands them to a backend.
#[derive(Debug, Clone)]
pub struct Plotter {
    backend: Backend,
    window: (f64, f64),
    samples: usize,
}

impl Plotter {
    pub fn new(backend: Backend, window: (f64, f64), samples: usize) -> Self {
        Self {
            backend,
            window,
            samples: samples.max(2),
        }
    }

    pub fn from_settings(settings: &PlotSettings) -> Self {
        let backend: Backend = match settings.backend {
            BackendKind::Plotters => PlottersBackend {
                output_dir: settings.output_dir.clone(),
                width: settings.width,
                height: settings.height,
            }
            .into(),
            BackendKind::Gnuplot => GnuplotBackend {
                output_dir: (!settings.show).then(|| settings.output_dir.clone()),
                width: settings.width,
                height: settings.height,
            }
            .into(),
        };
        Self::new(backend, settings.window, settings.samples)
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Chart description of `f` sampled over the window.
    pub fn plot_data(&self, f: &ScalarExpression, label: &str) -> PlotData {
        let var = f.variable_or_default();
        let xs = linspace(self.window.0, self.window.1, self.samples + 1);
        let ys = f.expression().calc_vector_lambdified1D(var, &xs);
        PlotData {
            title: format!("Plot of {}({}) = {}", label, var, f),
            x_label: var.to_string(),
            y_label: format!("{}({})", label, var),
            caption: format!("{}({}) = {}", label, var, f),
            segments: split_into_segments(&xs, &ys),
            file_stem: file_stem_for(&format!("{}_{}", label, f)),
        }
    }

    fn draw(&self, data: &PlotData) -> CalcResult<Option<PathBuf>> {
        if data.segments.is_empty() {
            warn!("{} is undefined on the whole plot window", data.caption);
        }
        let written = self.backend.render(data)?;
        info!("{} rendered with {}: {:?}", data.title, self.backend.name(), written);
        Ok(written)
    }

    /// Plots `f`; `NoFunction` when there is none.
    pub fn plot(&self, f: Option<&ScalarExpression>) -> CalcResult<Option<PathBuf>> {
        let f = f.ok_or(CalcError::NoFunction)?;
        self.draw(&self.plot_data(f, "f"))
    }

    /// Plots the derivative of order `order` of `f`.
    pub fn plot_derivative(
        &self,
        f: Option<&ScalarExpression>,
        order: usize,
    ) -> CalcResult<Option<PathBuf>> {
        let f = f.ok_or(CalcError::NoFunction)?;
        let derivative = differentiate(f, order);
        let label = derivative_label(order);
        self.draw(&self.plot_data(&derivative, &label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::str::FromStr;

    fn plotter(dir: PathBuf) -> Plotter {
        Plotter::new(
            PlottersBackend {
                output_dir: dir,
                width: 400,
                height: 300,
            }
            .into(),
            (-100.0, 100.0),
            2000,
        )
    }

    #[test]
    fn test_split_into_segments() {
        let xs = [-2.0, -1.0, 0.0, 1.0, 2.0];
        let ys = [0.5, 1.0, f64::INFINITY, 1.0, f64::NAN];
        assert_eq!(
            split_into_segments(&xs, &ys),
            vec![vec![(-2.0, 0.5), (-1.0, 1.0)], vec![(1.0, 1.0)]]
        );
        assert!(split_into_segments(&xs, &[f64::NAN; 5]).is_empty());
    }

    #[test]
    fn test_plot_data() {
        let p = plotter(PathBuf::from("."));
        let f = ScalarExpression::create("1/x").unwrap();
        let data = p.plot_data(&f, "f");
        assert_eq!(data.title, "Plot of f(x) = 1/x");
        assert_eq!(data.x_label, "x");
        assert_eq!(data.y_label, "f(x)");
        assert_eq!(data.segments.len(), 2);
        assert_eq!(data.file_stem, "plot_f_1_x");
        let (xr, yr) = data.bounds().unwrap();
        assert_eq!((xr.start, xr.end), (-100.0, 100.0));
        assert_relative_eq!(yr.start, -10.0, epsilon = 1e-9);
        assert_relative_eq!(yr.end, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_constant_function_is_plotted_over_x() {
        let p = plotter(PathBuf::from("."));
        let data = p.plot_data(&ScalarExpression::create("3").unwrap(), "f");
        assert_eq!(data.segments.len(), 1);
        assert_eq!(data.segments[0].len(), 2001);
        let (_, yr) = data.bounds().unwrap();
        assert_eq!((yr.start, yr.end), (2.0, 4.0));
    }

    #[test]
    fn test_missing_function() {
        let p = plotter(PathBuf::from("."));
        assert!(matches!(p.plot(None), Err(CalcError::NoFunction)));
        assert!(matches!(p.plot_derivative(None, 1), Err(CalcError::NoFunction)));
    }

    #[test]
    fn test_backends_reject_empty_data() {
        let dir = tempfile::tempdir().unwrap();
        let data = plotter(dir.path().to_path_buf())
            .plot_data(&ScalarExpression::create("ln(x - 1000)").unwrap(), "f");
        assert!(data.segments.is_empty());
        assert!(data.bounds().is_none());
        let plotters = PlottersBackend {
            output_dir: dir.path().to_path_buf(),
            width: 400,
            height: 300,
        };
        assert!(matches!(plotters.render(&data), Err(CalcError::Plot(_))));
        let gnuplot = GnuplotBackend {
            output_dir: None,
            width: 400,
            height: 300,
        };
        assert!(matches!(gnuplot.render(&data), Err(CalcError::Plot(_))));
    }

    #[test]
    fn test_from_settings_picks_gnuplot_target() {
        let mut settings = PlotSettings {
            backend: BackendKind::Gnuplot,
            output_dir: PathBuf::from("charts"),
            ..PlotSettings::default()
        };
        let p = Plotter::from_settings(&settings);
        assert_eq!(p.backend_name(), "gnuplot");
        match &p.backend {
            Backend::GnuplotBackend(g) => assert_eq!(g.output_dir, Some(PathBuf::from("charts"))),
            other => panic!("unexpected backend {:?}", other),
        }
        settings.show = true;
        match &Plotter::from_settings(&settings).backend {
            Backend::GnuplotBackend(g) => assert_eq!(g.output_dir, None),
            other => panic!("unexpected backend {:?}", other),
        }
        settings.backend = BackendKind::Plotters;
        assert_eq!(Plotter::from_settings(&settings).backend_name(), "plotters");
    }

    #[test]
    fn test_backend_kind_from_str() {
        assert_eq!(BackendKind::from_str("gnuplot").unwrap(), BackendKind::Gnuplot);
        assert_eq!(BackendKind::from_str("Plotters").unwrap(), BackendKind::Plotters);
        assert!(BackendKind::from_str("excel").is_err());
        assert_eq!(BackendKind::Gnuplot.to_string(), "gnuplot");
    }

    #[test]
    #[ignore = "needs system fonts for the chart caption"]
    fn test_plotters_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let p = plotter(dir.path().to_path_buf());
        let f = ScalarExpression::create("x^2").unwrap();
        let path = p.plot_derivative(Some(&f), 1).unwrap().unwrap();
        assert!(path.exists());
        assert_eq!(path.file_name().unwrap(), "plot_f__2_x.png");
    }
}
