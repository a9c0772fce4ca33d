//! Visualization utilities for footstep_planner
//!
//! Plots footstep plans with gnuplot. Series are collected first and drawn
//! onto a single set of axes when the plot is saved.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{Leg, PlannerError, PlannerResult};
use crate::footstep_planning::FootstepState;

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00FF00";
    pub const BLUE: &str = "#0000FF";
    pub const GRAY: &str = "#808080";

    // Semantic colors
    pub const LEFT_FOOT: &str = BLUE;
    pub const RIGHT_FOOT: &str = RED;
    pub const START: &str = GREEN;
    pub const GOAL: &str = BLACK;
    pub const TRAJECTORY: &str = GRAY;
}

/// Style for line rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

/// Style for point rendering
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'O',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_symbol(mut self, symbol: char) -> Self {
        self.symbol = symbol;
        self
    }
}

#[derive(Debug, Clone)]
enum Series {
    Lines {
        x: Vec<f64>,
        y: Vec<f64>,
        style: PathStyle,
    },
    Points {
        x: Vec<f64>,
        y: Vec<f64>,
        style: PointStyle,
    },
}

/// Plot of a footstep plan
pub struct Visualizer {
    series: Vec<Series>,
    title: String,
    x_label: String,
    y_label: String,
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            series: Vec::new(),
            title: String::new(),
            x_label: "X [m]".to_string(),
            y_label: "Y [m]".to_string(),
        }
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    /// Number of collected series
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn plot_lines_xy(&mut self, x: &[f64], y: &[f64], style: &PathStyle) -> &mut Self {
        self.series.push(Series::Lines {
            x: x.to_vec(),
            y: y.to_vec(),
            style: style.clone(),
        });
        self
    }

    pub fn plot_points_xy(&mut self, x: &[f64], y: &[f64], style: &PointStyle) -> &mut Self {
        self.series.push(Series::Points {
            x: x.to_vec(),
            y: y.to_vec(),
            style: style.clone(),
        });
        self
    }

    /// Outline of one foot, closed back onto its first corner
    pub fn plot_footprint(&mut self, state: &FootstepState, style: &PathStyle) -> &mut Self {
        let (x, y) = footprint_outline(state);
        self.plot_lines_xy(&x, &y, style)
    }

    /// Footprints of a whole plan, colored per leg, joined by the trajectory of foot centers
    pub fn plot_plan(&mut self, path: &[FootstepState]) -> &mut Self {
        let x: Vec<f64> = path.iter().map(|s| s.pose().translation.vector.x).collect();
        let y: Vec<f64> = path.iter().map(|s| s.pose().translation.vector.y).collect();
        self.plot_lines_xy(
            &x,
            &y,
            &PathStyle::new(colors::TRAJECTORY, "Steps").with_line_width(1.0),
        );

        // Only the first footprint of each leg carries a caption
        let mut captioned = [false; 2];
        for state in path {
            let (color, name, slot) = match state.leg() {
                Leg::Left => (colors::LEFT_FOOT, "Left", 0),
                Leg::Right => (colors::RIGHT_FOOT, "Right", 1),
            };
            let caption = if captioned[slot] { "" } else { name };
            captioned[slot] = true;
            self.plot_footprint(state, &PathStyle::new(color, caption));
        }
        self
    }

    pub fn plot_start(&mut self, state: &FootstepState) -> &mut Self {
        let p = state.position();
        self.plot_points_xy(
            &[p.x],
            &[p.y],
            &PointStyle::new(colors::START, "Start").with_size(1.5),
        )
    }

    pub fn plot_goal(&mut self, state: &FootstepState) -> &mut Self {
        let p = state.position();
        self.plot_points_xy(
            &[p.x],
            &[p.y],
            &PointStyle::new(colors::GOAL, "Goal")
                .with_size(1.5)
                .with_symbol('x'),
        )
    }

    pub fn save_png(&self, path: &str, width: u32, height: u32) -> PlannerResult<()> {
        let mut figure = self.render();
        figure
            .save_to_png(path, width, height)
            .map_err(|e| PlannerError::VisualizationError(e.to_string()))
    }

    pub fn save_svg(&self, path: &str) -> PlannerResult<()> {
        let mut figure = self.render();
        figure
            .save_to_svg(path, 800, 600)
            .map_err(|e| PlannerError::VisualizationError(e.to_string()))
    }

    fn render(&self) -> Figure {
        let mut figure = Figure::new();
        let axes = figure.axes2d();

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label(&self.x_label, &[]);
        axes.set_y_label(&self.y_label, &[]);

        // Footprints are only readable at equal axis scales
        axes.set_aspect_ratio(AutoOption::Fix(1.0));

        for series in &self.series {
            match series {
                Series::Lines { x, y, style } => {
                    axes.lines(
                        x,
                        y,
                        &[
                            Caption(&style.caption),
                            Color(&style.color),
                            LineWidth(style.line_width),
                        ],
                    );
                }
                Series::Points { x, y, style } => {
                    axes.points(
                        x,
                        y,
                        &[
                            Caption(&style.caption),
                            Color(&style.color),
                            PointSymbol(style.symbol),
                            PointSize(style.size),
                        ],
                    );
                }
            }
        }
        figure
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

fn footprint_outline(state: &FootstepState) -> (Vec<f64>, Vec<f64>) {
    let corners = state.footprint();
    let mut x: Vec<f64> = corners.iter().map(|c| c.x).collect();
    let mut y: Vec<f64> = corners.iter().map(|c| c.y).collect();
    x.push(corners[0].x);
    y.push(corners[0].y);
    (x, y)
}

/// Plot a plan with its start and goal stances
pub fn quick_plot_plan(
    path: &[FootstepState],
    goals: Option<(&FootstepState, &FootstepState)>,
    title: &str,
) -> Visualizer {
    let mut vis = Visualizer::new();
    vis.set_title(title);

    vis.plot_plan(path);
    if let Some(start) = path.first() {
        vis.plot_start(start);
    }
    if let Some((left, right)) = goals {
        vis.plot_goal(left);
        vis.plot_footprint(left, &PathStyle::new(colors::GOAL, "").with_line_width(1.0));
        vis.plot_footprint(right, &PathStyle::new(colors::GOAL, "").with_line_width(1.0));
    }

    vis
}
