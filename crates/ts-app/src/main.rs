//! Main application entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use eframe::egui::{self, Color32, Context};
use tracing::{info, warn};

use ts_core::{Frame, InputEvent, KeyCommand, PointerButton, RangeSlider, Slider};
use ts_data::{load_day_csv, DayStore};
use ts_ui::{
    day_switch_hit, draw_chart, draw_day_switch, draw_range_slider, draw_slider, show_table,
    ControlStyle, DaySwitchHit,
};
use ts_views::{
    capture, restore, rewire, ChartConfig, ChartMode, ChartView, ElementRecord, LayoutDoc,
    TableView,
};

mod demo;
mod session;

/// Day directories are probed up to this number before wrapping.
const MAX_DAYS: u32 = 99;

/// Element a position drag is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragTarget {
    Chart(usize),
    Table,
    DaySwitch,
}

/// Main application state
struct TickscopeApp {
    /// Day directories under the data root
    days: DayStore,

    /// The scrub control
    slider: Arc<Slider>,

    /// The window control
    range: Arc<RangeSlider>,

    /// Chart viewports, first one re-publishes its window onto the scrub control
    charts: Vec<Arc<ChartView>>,

    /// The windowed value table
    table: Arc<TableView>,

    /// Where the day switch sits on the canvas
    day_switch_frame: Frame,

    /// When locked, elements cannot be moved or resized
    layout_locked: bool,

    /// Element currently being dragged, if any
    dragged: Option<DragTarget>,

    /// One-line feedback shown at the right of the menu bar
    status: String,

    /// Shared widget palette
    style: ControlStyle,

    /// Height of the menu strip from the last frame, clicks above it stay in egui
    menu_height: f32,
}

impl TickscopeApp {
    fn new(data_root: PathBuf) -> Result<Self> {
        let days = DayStore::new(&data_root, 1, MAX_DAYS);
        let charts = build_default_charts(&days);

        let max_len = charts
            .iter()
            .map(|chart| chart.series().len())
            .max()
            .unwrap_or(100);
        let last = (max_len.saturating_sub(1)).max(1) as f64;

        let slider = Arc::new(Slider::new(
            Frame::new(60.0, 600.0, 700.0, 20.0),
            0.0,
            last,
            0.0,
        )?);
        let range = Arc::new(RangeSlider::new(
            Frame::new(60.0, 640.0, 700.0, 20.0),
            0.0,
            last,
        )?);
        let table = Arc::new(TableView::with_default_rows(Frame::new(870.0, 50.0, 0.0, 0.0)));

        rewire(&slider, &range, &charts, &table);

        let status = format!("Day {}", days.current_day());
        Ok(Self {
            days,
            slider,
            range,
            charts,
            table,
            day_switch_frame: Frame::new(560.0, 60.0, 0.0, 0.0),
            layout_locked: false,
            dragged: None,
            status,
            style: ControlStyle::default(),
            menu_height: 0.0,
        })
    }

    /// Translate raw egui input into engine events, oldest first.
    fn gather_events(&self, ctx: &Context) -> Vec<InputEvent> {
        let mut events = Vec::new();
        ctx.input(|i| {
            if let Some(pos) = i.pointer.interact_pos() {
                if i.pointer.button_pressed(egui::PointerButton::Primary) {
                    events.push(InputEvent::ButtonDown {
                        x: pos.x,
                        y: pos.y,
                        button: PointerButton::Primary,
                    });
                }
                if i.pointer.button_pressed(egui::PointerButton::Secondary) {
                    events.push(InputEvent::ButtonDown {
                        x: pos.x,
                        y: pos.y,
                        button: PointerButton::Secondary,
                    });
                }
                let delta = i.pointer.delta();
                if delta != egui::Vec2::ZERO {
                    events.push(InputEvent::Motion {
                        x: pos.x,
                        y: pos.y,
                        dx: delta.x,
                        dy: delta.y,
                    });
                }
            }
            if i.pointer.any_released() {
                events.push(InputEvent::ButtonUp);
            }
            for (key, command) in [
                (egui::Key::PlusEquals, KeyCommand::Grow),
                (egui::Key::Minus, KeyCommand::Shrink),
                (egui::Key::ArrowLeft, KeyCommand::StepLeft),
                (egui::Key::ArrowRight, KeyCommand::StepRight),
            ] {
                if i.key_pressed(key) {
                    events.push(InputEvent::KeyDown(command));
                }
            }
        });
        // Presses that land on egui surfaces stay there. The table is an
        // egui area too, but the shell drags it itself.
        events.retain(|event| match event {
            InputEvent::ButtonDown { x, y, .. } => self.canvas_press_allowed(ctx, *x, *y),
            _ => true,
        });
        events
    }

    fn canvas_press_allowed(&self, ctx: &Context, x: f32, y: f32) -> bool {
        if y <= self.menu_height {
            return false;
        }
        if self.table.contains(x, y) {
            return true;
        }
        let covered = ctx
            .layer_id_at(egui::Pos2::new(x, y))
            .map(|layer| layer.order != egui::Order::Background)
            .unwrap_or(false);
        !covered
    }

    fn route_events(&mut self, events: Vec<InputEvent>) {
        for event in events {
            match event {
                InputEvent::ButtonDown { x, y, button } => self.on_button_down(x, y, button),
                InputEvent::Motion { x, y, dx, dy } => self.on_motion(x, y, dx, dy),
                InputEvent::ButtonUp => self.on_button_up(),
                InputEvent::KeyDown(command) => self.on_key(command),
            }
        }
    }

    fn on_button_down(&mut self, x: f32, y: f32, button: PointerButton) {
        let event = InputEvent::ButtonDown { x, y, button };
        if self.slider.handle_event(event, self.layout_locked) {
            return;
        }
        if self.range.handle_event(event, self.layout_locked) {
            return;
        }

        if button != PointerButton::Primary {
            return;
        }

        // Arrows switch days even while the layout is locked.
        match day_switch_hit(self.day_switch_frame, x, y) {
            Some(DaySwitchHit::Prev) => {
                self.switch_day(-1);
                return;
            }
            Some(DaySwitchHit::Next) => {
                self.switch_day(1);
                return;
            }
            Some(DaySwitchHit::Body) => {
                if !self.layout_locked {
                    self.dragged = Some(DragTarget::DaySwitch);
                }
                return;
            }
            None => {}
        }

        if self.layout_locked {
            return;
        }
        // The table draws above the charts, so it wins overlapping presses.
        if self.table.contains(x, y) {
            self.dragged = Some(DragTarget::Table);
            return;
        }
        if let Some(idx) = self.charts.iter().position(|chart| chart.contains(x, y)) {
            self.dragged = Some(DragTarget::Chart(idx));
        }
    }

    fn on_motion(&mut self, x: f32, y: f32, dx: f32, dy: f32) {
        let event = InputEvent::Motion { x, y, dx, dy };
        if self.slider.handle_event(event, self.layout_locked) {
            return;
        }
        if self.range.handle_event(event, self.layout_locked) {
            return;
        }
        match self.dragged {
            Some(DragTarget::Chart(idx)) => {
                if let Some(chart) = self.charts.get(idx) {
                    chart.update_position(dx, dy);
                }
            }
            Some(DragTarget::Table) => self.table.update_position(dx, dy),
            Some(DragTarget::DaySwitch) => self.day_switch_frame.translate(dx, dy),
            None => {}
        }
    }

    fn on_button_up(&mut self) {
        self.slider.handle_event(InputEvent::ButtonUp, self.layout_locked);
        self.range.handle_event(InputEvent::ButtonUp, self.layout_locked);
        self.dragged = None;
    }

    fn on_key(&mut self, command: KeyCommand) {
        match command {
            KeyCommand::Grow | KeyCommand::Shrink => {
                // Resize applies to the chart a drag is attached to.
                if self.layout_locked {
                    return;
                }
                if let Some(DragTarget::Chart(idx)) = self.dragged {
                    if let Some(chart) = self.charts.get(idx) {
                        if command == KeyCommand::Grow {
                            chart.grow();
                        } else {
                            chart.shrink();
                        }
                    }
                }
            }
            KeyCommand::StepLeft => self.slider.step(-1.0),
            KeyCommand::StepRight => self.slider.step(1.0),
        }
    }

    /// Step to the next readable day and swap every chart's series.
    ///
    /// Charts whose file is missing in the new day keep their old data.
    fn switch_day(&mut self, direction: i32) {
        let Some(day) = self.days.step(direction) else {
            self.status = "no day directories found".to_string();
            return;
        };
        for chart in &self.charts {
            let path = self.days.file_path(day, &chart.config().file);
            match load_day_csv(&path) {
                Ok(series) => chart.switch_series(Arc::new(series)),
                Err(err) => warn!("keeping previous data for {}: {err}", path.display()),
            }
        }
        info!("switched to day {day}");
        self.status = format!("Day {day}");
    }

    fn save_layout(&mut self) {
        let doc = capture(
            &self.slider,
            &self.range,
            &self.charts,
            &self.table,
            Some((self.day_switch_frame, self.days.current_day())),
        );
        let path = session::layout_path(self.days.root());
        match session::save_layout(&path, &doc) {
            Ok(()) => {
                info!("layout saved to {}", path.display());
                self.status = "layout saved".to_string();
            }
            Err(err) => {
                warn!("saving layout failed: {err:#}");
                self.status = "saving layout failed".to_string();
            }
        }
    }

    fn load_layout(&mut self) {
        let path = session::layout_path(self.days.root());
        let doc = match session::load_layout(&path) {
            Ok(doc) => doc,
            Err(err) => {
                warn!("loading layout failed: {err:#}");
                self.status = "no saved layout".to_string();
                return;
            }
        };

        let day = saved_day(&doc).unwrap_or(self.days.current_day());
        let days = DayStore::new(self.days.root(), day, MAX_DAYS);
        let loader = |file: &str| {
            let path = days.file_path(days.current_day(), file);
            match load_day_csv(&path) {
                Ok(series) => Some(Arc::new(series)),
                Err(err) => {
                    warn!("cannot load {}: {err}", path.display());
                    None
                }
            }
        };

        match restore(&doc, &loader) {
            Ok(restored) => {
                self.slider = restored.slider;
                self.range = restored.range;
                self.charts = restored.charts;
                self.table = restored.table;
                if let Some((frame, _)) = restored.day_switch {
                    self.day_switch_frame = frame;
                }
                self.days = days;
                self.dragged = None;
                info!("layout loaded from {}", path.display());
                self.status = format!("layout loaded, Day {}", self.days.current_day());
            }
            Err(err) => {
                warn!("restoring layout failed: {err:#}");
                self.status = "layout file is unusable".to_string();
            }
        }
    }

    /// Handle menu actions
    fn handle_menu(&mut self, ctx: &Context) {
        let bar = egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Layout", |ui| {
                    if ui.button("Save Layout").clicked() {
                        self.save_layout();
                        ui.close_menu();
                    }
                    if ui.button("Load Layout").clicked() {
                        self.load_layout();
                        ui.close_menu();
                    }
                    ui.separator();
                    let label = if self.layout_locked {
                        "Unlock Layout"
                    } else {
                        "Lock Layout"
                    };
                    if ui.button(label).clicked() {
                        self.layout_locked = !self.layout_locked;
                        ui.close_menu();
                    }
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(&self.status);
                });
            });
        });
        self.menu_height = bar.response.rect.height();
    }
}

impl eframe::App for TickscopeApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let events = self.gather_events(ctx);
        self.route_events(events);

        self.handle_menu(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let painter = ui.painter();
            for chart in &self.charts {
                draw_chart(painter, &chart.render_model(), &self.style);
            }
            draw_slider(painter, &self.slider.snapshot(), &self.style);
            draw_range_slider(painter, &self.range.snapshot(), &self.style);
            draw_day_switch(
                painter,
                self.day_switch_frame,
                self.days.current_day(),
                &self.style,
            );
        });

        show_table(ctx, &self.table, &self.style);
    }
}

/// The out-of-the-box canvas: a price chart with signals, a smoothed
/// companion line and a five-minute candle view of the same file.
fn build_default_charts(days: &DayStore) -> Vec<Arc<ChartView>> {
    let configs = [
        (
            Frame::new(30.0, 50.0, 480.0, 280.0),
            ChartConfig {
                column: "price".to_string(),
                profit_coloring: true,
                signal_column: Some("signal".to_string()),
                color: Color32::from_rgb(255, 0, 0),
                ..ChartConfig::default()
            },
        ),
        (
            Frame::new(30.0, 360.0, 440.0, 200.0),
            ChartConfig {
                column: "fast".to_string(),
                color: Color32::from_rgb(0, 255, 0),
                ..ChartConfig::default()
            },
        ),
        (
            Frame::new(490.0, 360.0, 440.0, 200.0),
            ChartConfig {
                column: "price".to_string(),
                mode: ChartMode::Candles,
                color: Color32::from_rgb(0, 0, 255),
                ..ChartConfig::default()
            },
        ),
    ];

    let mut charts = Vec::new();
    for (frame, config) in configs {
        let path = days.file_path(days.current_day(), &config.file);
        match load_day_csv(&path) {
            Ok(series) => charts.push(Arc::new(ChartView::new(frame, config, Arc::new(series)))),
            Err(err) => warn!("skipping chart, cannot load {}: {err}", path.display()),
        }
    }
    charts
}

fn saved_day(doc: &LayoutDoc) -> Option<u32> {
    doc.elements.iter().find_map(|record| match record {
        ElementRecord::DaySwitch { current_day, .. } => Some(*current_day),
        _ => None,
    })
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let data_root = PathBuf::from("data");
    demo::ensure_demo_days(&data_root)?;

    info!("Starting tickscope");

    let app = TickscopeApp::new(data_root)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "tickscope",
        options,
        Box::new(move |cc| {
            ts_ui::apply_theme(&cc.egui_ctx);
            Box::new(app)
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
