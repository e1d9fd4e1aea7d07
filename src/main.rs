#![windows_subsystem = "windows"]

use std::sync::Arc;

use chrono::{Datelike, Local};
use eframe::egui::{self, Align2, Color32, CornerRadius, FontId, Pos2, Rect, RichText, Stroke, Vec2};
use zhangben::input::{check_category, compose_target, parse_amount};
use zhangben::{
    aggregate, category_totals, filter_by_time, init_logging, search, total, AppConfig, Bucket,
    CategoryFilter, Granularity, Record, RecordStore, TimeFilter,
};

// ===== UI 主题配置 =====
struct Theme {
    bg_color: Color32,
    card_color: Color32,
    input_bg: Color32,
    accent_color: Color32,
    green_color: Color32,
    text_primary: Color32,
    text_secondary: Color32,
    danger_color: Color32,
    warning_color: Color32,
}

impl Theme {
    fn default() -> Self {
        Self {
            bg_color: Color32::from_rgb(25, 28, 32),
            card_color: Color32::from_rgb(35, 39, 45),
            input_bg: Color32::from_rgb(45, 50, 58),
            accent_color: Color32::from_rgb(64, 169, 255),
            green_color: Color32::from_rgb(82, 196, 126),
            text_primary: Color32::from_rgb(230, 230, 235),
            text_secondary: Color32::from_rgb(140, 145, 155),
            danger_color: Color32::from_rgb(220, 80, 80),
            warning_color: Color32::from_rgb(230, 180, 80),
        }
    }
}

// ===== 布局常量配置 =====
struct LayoutConfig {
    content_width: f32,
    panel_margin: f32,
    card_rounding: f32,
    card_inner_margin: f32,
    input_height: f32,
}

impl LayoutConfig {
    fn default() -> Self {
        Self {
            content_width: 880.0,
            panel_margin: 24.0,
            card_rounding: 14.0,
            card_inner_margin: 20.0,
            input_height: 32.0,
        }
    }
}

/// 饼图配色
const PIE_COLORS: [Color32; 8] = [
    Color32::from_rgb(64, 169, 255),
    Color32::from_rgb(82, 196, 126),
    Color32::from_rgb(230, 180, 80),
    Color32::from_rgb(220, 80, 80),
    Color32::from_rgb(160, 110, 230),
    Color32::from_rgb(80, 200, 200),
    Color32::from_rgb(240, 130, 180),
    Color32::from_rgb(150, 150, 160),
];

const FONT_CANDIDATES: [&str; 7] = [
    "simhei.ttf",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\simhei.ttf",
    "/System/Library/Fonts/PingFang.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
];

fn main() -> eframe::Result<()> {
    let config = AppConfig::load(&AppConfig::default_data_dir());
    if let Err(e) = init_logging(&config.data_dir, &config.log_level) {
        eprintln!("日志初始化失败: {e}");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 780.0])
            .with_min_inner_size([720.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "高级记账本",
        options,
        Box::new(|cc| {
            setup_fonts(&cc.egui_ctx);
            Ok(Box::new(App::new(config)))
        }),
    )
}

fn setup_fonts(ctx: &egui::Context) {
    let found = FONT_CANDIDATES
        .iter()
        .find_map(|path| std::fs::read(path).ok().map(|data| (*path, data)));
    let Some((path, font_data)) = found else {
        tracing::warn!("no CJK font found, Chinese text may not render");
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        "cjk".to_owned(),
        Arc::new(egui::FontData::from_owned(font_data)),
    );
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        if let Some(list) = fonts.families.get_mut(&family) {
            list.insert(0, "cjk".to_owned());
        }
    }
    ctx.set_fonts(fonts);
    tracing::info!("loaded CJK font {path}");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Entry,
    Search,
    Records,
    Stats,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Entry, Tab::Search, Tab::Records, Tab::Stats];

    fn label(self) -> &'static str {
        match self {
            Tab::Entry => "记账",
            Tab::Search => "搜索",
            Tab::Records => "记录",
            Tab::Stats => "统计",
        }
    }
}

struct App {
    config: AppConfig,
    store: RecordStore,
    /// 最近一次 `load()` 的快照，所有页面都从这里计算
    records: Vec<Record>,
    tab: Tab,

    input_category: String,
    input_remark: String,
    input_amount: String,
    input_amount_error: bool,

    filter_kind: TimeFilter,
    filter_year: String,
    filter_month: String,
    filter_day: String,
    applied_filter: Option<(TimeFilter, String)>,

    keyword: String,
    applied_keyword: Option<String>,

    granularity: Granularity,
    stats_category: CategoryFilter,

    pending_delete: Option<usize>,

    message: String,
    message_is_error: bool,
    message_timer: f32,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let store = RecordStore::from_config(&config);
        let today = Local::now().date_naive();
        let input_category = config.categories.first().cloned().unwrap_or_default();

        let mut app = Self {
            config,
            store,
            records: Vec::new(),
            tab: Tab::Entry,
            input_category,
            input_remark: String::new(),
            input_amount: String::new(),
            input_amount_error: false,
            filter_kind: TimeFilter::All,
            filter_year: today.year().to_string(),
            filter_month: today.month().to_string(),
            filter_day: today.day().to_string(),
            applied_filter: None,
            keyword: String::new(),
            applied_keyword: None,
            granularity: Granularity::Monthly,
            stats_category: CategoryFilter::All,
            pending_delete: None,
            message: String::new(),
            message_is_error: false,
            message_timer: 0.0,
        };
        app.refresh_data();
        app
    }

    /// 修改之后重新读取文件，替换快照
    fn refresh_data(&mut self) {
        match self.store.load() {
            Ok(records) => self.records = records,
            Err(e) => self.show_message(&format!("读取记录失败：{e}"), true),
        }
        self.pending_delete = None;
    }

    fn show_message(&mut self, msg: &str, is_error: bool) {
        self.message = msg.to_string();
        self.message_is_error = is_error;
        self.message_timer = 3.0;
    }

    fn add_record(&mut self) {
        self.input_amount_error = false;

        let amount = match parse_amount(&self.input_amount) {
            Ok(amount) => amount,
            Err(e) => {
                self.input_amount_error = true;
                self.show_message(&format!("错误：{e}"), true);
                return;
            }
        };
        let category = match check_category(&self.input_category, &self.config.categories) {
            Ok(category) => category.to_string(),
            Err(e) => {
                self.show_message(&format!("错误：{e}"), true);
                return;
            }
        };

        match self.store.append(&category, self.input_remark.trim(), amount) {
            Ok(_) => {
                self.input_remark.clear();
                self.input_amount.clear();
                self.refresh_data();
                let msg = format!("保存成功！累计支出：{}", format_money(total(&self.records)));
                self.show_message(&msg, false);
            }
            Err(e) => self.show_message(&format!("保存失败：{e}"), true),
        }
    }

    fn apply_time_filter(&mut self) {
        match compose_target(
            self.filter_kind,
            &self.filter_year,
            &self.filter_month,
            &self.filter_day,
        ) {
            Ok(target) => self.applied_filter = Some((self.filter_kind, target)),
            Err(e) => {
                self.applied_filter = None;
                self.show_message(&format!("错误：{e}"), true);
            }
        }
    }

    fn apply_search(&mut self) {
        let keyword = self.keyword.trim();
        if keyword.is_empty() {
            self.applied_keyword = None;
            self.show_message("错误：请输入搜索关键词！", true);
            return;
        }
        self.applied_keyword = Some(keyword.to_string());
    }

    /// `display_index` 是倒序列表中的位置，换算成文件中的位置再删除
    fn delete_record(&mut self, display_index: usize) {
        let Some(index) = self.records.len().checked_sub(display_index + 1) else {
            return;
        };
        match self.store.delete_at(index) {
            Ok(record) => {
                self.refresh_data();
                self.show_message(&format!("已删除 {} {}", record.time, record.category), false);
            }
            Err(e) => {
                self.refresh_data();
                self.show_message(&format!("删除失败：{e}"), true);
            }
        }
    }
}

/// 格式化金额显示，大金额使用万/亿为单位
fn format_money(amount: f64) -> String {
    let abs_amount = amount.abs();
    let sign = if amount < 0.0 { "-" } else { "" };

    if abs_amount >= 100_000_000.0 {
        format!("{}¥{:.2}亿", sign, abs_amount / 100_000_000.0)
    } else if abs_amount >= 100_000.0 {
        format!("{}¥{:.2}万", sign, abs_amount / 10_000.0)
    } else {
        format!("{}¥{:.2}", sign, abs_amount)
    }
}

fn card<R>(
    ui: &mut egui::Ui,
    theme: &Theme,
    layout: &LayoutConfig,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    let width = ui.available_width();
    egui::Frame::default()
        .fill(theme.card_color)
        .corner_radius(CornerRadius::same(layout.card_rounding as u8))
        .inner_margin(layout.card_inner_margin as i8)
        .show(ui, |ui| {
            ui.set_width(width - layout.card_inner_margin * 2.0);
            add_contents(ui)
        })
        .inner
}

fn primary_button(text: &str, fill: Color32) -> egui::Button<'static> {
    egui::Button::new(RichText::new(text).size(14.0).color(Color32::WHITE))
        .fill(fill)
        .corner_radius(CornerRadius::same(6))
}

fn record_row(ui: &mut egui::Ui, record: &Record, theme: &Theme) {
    let remark = if record.remark.is_empty() {
        "无"
    } else {
        record.remark.as_str()
    };
    ui.label(RichText::new(&record.time).size(13.0).color(theme.accent_color));
    ui.label(RichText::new(&record.category).size(13.0).color(theme.text_primary));
    ui.label(RichText::new(remark).size(13.0).color(theme.text_secondary));
    ui.label(
        RichText::new(format!("{:.2} 元", record.amount))
            .size(13.0)
            .strong()
            .color(theme.text_primary),
    );
}

fn record_list(ui: &mut egui::Ui, records: &[Record], theme: &Theme, id: &str) {
    if records.is_empty() {
        ui.label(RichText::new("暂无匹配记录").size(15.0).color(theme.text_secondary));
        return;
    }
    egui::ScrollArea::vertical()
        .id_salt(id)
        .auto_shrink([false, false])
        .max_height(360.0)
        .show(ui, |ui| {
            egui::Grid::new(id).striped(true).spacing([18.0, 8.0]).show(ui, |ui| {
                for record in records.iter().rev() {
                    record_row(ui, record, theme);
                    ui.end_row();
                }
            });
        });
}

fn draw_bar_chart(ui: &mut egui::Ui, buckets: &[Bucket], theme: &Theme) {
    let size = Vec2::new(ui.available_width(), 240.0);
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    let painter = ui.painter_at(rect);

    let plot = Rect::from_min_max(
        Pos2::new(rect.left(), rect.top() + 18.0),
        Pos2::new(rect.right(), rect.bottom() - 20.0),
    );
    painter.line_segment(
        [plot.left_bottom(), plot.right_bottom()],
        Stroke::new(1.0, theme.text_secondary),
    );

    let max = buckets.iter().map(|b| b.total).fold(0.0_f64, f64::max);
    let slot = plot.width() / buckets.len().max(1) as f32;
    for (i, bucket) in buckets.iter().enumerate() {
        let x = plot.left() + slot * (i as f32 + 0.5);
        let height = if max > 0.0 {
            (bucket.total / max) as f32 * plot.height()
        } else {
            0.0
        };
        if height > 0.0 {
            let bar = Rect::from_min_max(
                Pos2::new(x - slot * 0.3, plot.bottom() - height),
                Pos2::new(x + slot * 0.3, plot.bottom()),
            );
            painter.rect_filled(bar, CornerRadius::same(3), theme.accent_color);
            painter.text(
                Pos2::new(x, bar.top() - 2.0),
                Align2::CENTER_BOTTOM,
                format!("{:.0}", bucket.total),
                FontId::proportional(10.0),
                theme.text_primary,
            );
        }
        painter.text(
            Pos2::new(x, plot.bottom() + 4.0),
            Align2::CENTER_TOP,
            &bucket.label,
            FontId::proportional(10.0),
            theme.text_secondary,
        );
    }
}

fn draw_pie_chart(ui: &mut egui::Ui, shares: &[(String, f64)], theme: &Theme) {
    let sum: f64 = shares.iter().map(|(_, v)| v).sum();
    if sum <= 0.0 {
        ui.label(RichText::new("暂无数据").size(14.0).color(theme.text_secondary));
        return;
    }

    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(200.0), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = rect.width() / 2.0 - 4.0;

        // 每个扇形拆成小三角形，保证都是凸多边形
        let mut start = -std::f32::consts::FRAC_PI_2;
        for (i, (_, value)) in shares.iter().enumerate() {
            let sweep = (*value / sum) as f32 * std::f32::consts::TAU;
            let steps = ((sweep / 0.05).ceil() as usize).max(1);
            let color = PIE_COLORS[i % PIE_COLORS.len()];
            for s in 0..steps {
                let a0 = start + sweep * s as f32 / steps as f32;
                let a1 = start + sweep * (s + 1) as f32 / steps as f32;
                painter.add(egui::Shape::convex_polygon(
                    vec![
                        center,
                        center + radius * Vec2::angled(a0),
                        center + radius * Vec2::angled(a1),
                    ],
                    color,
                    Stroke::NONE,
                ));
            }
            start += sweep;
        }

        ui.add_space(24.0);
        ui.vertical(|ui| {
            for (i, (category, value)) in shares.iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("■").color(PIE_COLORS[i % PIE_COLORS.len()]));
                    ui.label(
                        RichText::new(format!(
                            "{category}  {}  ({:.1}%)",
                            format_money(*value),
                            value / sum * 100.0
                        ))
                        .size(13.0)
                        .color(theme.text_primary),
                    );
                });
            }
        });
    });
}

impl App {
    fn show_entry_tab(&mut self, ui: &mut egui::Ui, theme: &Theme, layout: &LayoutConfig) {
        card(ui, theme, layout, |ui| {
            ui.label(RichText::new("记一笔").size(16.0).color(theme.text_primary));
            ui.add_space(8.0);
            ui.label(
                RichText::new(format!("时间：{}", Local::now().format("%Y-%m-%d %H:%M")))
                    .size(13.0)
                    .color(theme.text_secondary),
            );
            ui.add_space(8.0);

            let mut submit = false;
            ui.horizontal(|ui| {
                ui.label(RichText::new("分类").color(theme.text_secondary));
                egui::ComboBox::from_id_salt("category_select")
                    .width(90.0)
                    .selected_text(self.input_category.clone())
                    .show_ui(ui, |ui| {
                        for category in &self.config.categories {
                            ui.selectable_value(
                                &mut self.input_category,
                                category.clone(),
                                category.as_str(),
                            );
                        }
                    });

                ui.add_space(12.0);
                ui.label(RichText::new("备注").color(theme.text_secondary));
                ui.add_sized(
                    [240.0, layout.input_height],
                    egui::TextEdit::singleline(&mut self.input_remark).hint_text("可不填"),
                );

                ui.add_space(12.0);
                ui.label(RichText::new("金额").color(theme.text_secondary));
                let amount_response = ui
                    .scope(|ui| {
                        if self.input_amount_error {
                            ui.visuals_mut().widgets.inactive.bg_stroke =
                                Stroke::new(1.0, theme.danger_color);
                            ui.visuals_mut().widgets.hovered.bg_stroke =
                                Stroke::new(1.0, theme.danger_color);
                        }
                        ui.add_sized(
                            [120.0, layout.input_height],
                            egui::TextEdit::singleline(&mut self.input_amount).hint_text("0.00"),
                        )
                    })
                    .inner;
                if amount_response.gained_focus() {
                    self.input_amount_error = false;
                }
                if amount_response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }

                ui.add_space(12.0);
                if ui
                    .add_sized([72.0, layout.input_height], primary_button("保存", theme.green_color))
                    .clicked()
                {
                    submit = true;
                }
            });
            if submit {
                self.add_record();
            }
        });

        ui.add_space(16.0);

        card(ui, theme, layout, |ui| {
            ui.label(RichText::new("时间筛选统计").size(16.0).color(theme.text_primary));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                egui::ComboBox::from_id_salt("filter_kind")
                    .width(70.0)
                    .selected_text(self.filter_kind.label())
                    .show_ui(ui, |ui| {
                        for kind in TimeFilter::ALL {
                            ui.selectable_value(&mut self.filter_kind, kind, kind.label());
                        }
                    });

                let needs_year = matches!(
                    self.filter_kind,
                    TimeFilter::ByDay | TimeFilter::ByMonth | TimeFilter::ByYear
                );
                let needs_month = matches!(self.filter_kind, TimeFilter::ByDay | TimeFilter::ByMonth);
                let needs_day = self.filter_kind == TimeFilter::ByDay;
                if needs_year {
                    ui.add_sized(
                        [60.0, layout.input_height],
                        egui::TextEdit::singleline(&mut self.filter_year).hint_text("年"),
                    );
                    ui.label(RichText::new("年").color(theme.text_secondary));
                }
                if needs_month {
                    ui.add_sized(
                        [40.0, layout.input_height],
                        egui::TextEdit::singleline(&mut self.filter_month).hint_text("月"),
                    );
                    ui.label(RichText::new("月").color(theme.text_secondary));
                }
                if needs_day {
                    ui.add_sized(
                        [40.0, layout.input_height],
                        egui::TextEdit::singleline(&mut self.filter_day).hint_text("日"),
                    );
                    ui.label(RichText::new("日").color(theme.text_secondary));
                }

                ui.add_space(12.0);
                if ui
                    .add_sized([72.0, layout.input_height], primary_button("统计", theme.accent_color))
                    .clicked()
                {
                    self.apply_time_filter();
                }
            });

            if let Some((kind, target)) = &self.applied_filter {
                let filtered = filter_by_time(&self.records, *kind, target);
                ui.add_space(10.0);
                ui.label(
                    RichText::new(format!(
                        "{}{}支出：{}（{} 笔）",
                        target,
                        kind.label(),
                        format_money(total(&filtered)),
                        filtered.len()
                    ))
                    .size(18.0)
                    .color(theme.accent_color),
                );
            }
        });
    }

    fn show_search_tab(&mut self, ui: &mut egui::Ui, theme: &Theme, layout: &LayoutConfig) {
        card(ui, theme, layout, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("搜索：").color(theme.text_secondary));
                let response = ui.add_sized(
                    [420.0, layout.input_height],
                    egui::TextEdit::singleline(&mut self.keyword).hint_text("模糊搜索分类或备注"),
                );
                let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui
                    .add_sized([110.0, layout.input_height], primary_button("搜索并求和", theme.warning_color))
                    .clicked()
                    || enter
                {
                    self.apply_search();
                }
            });
        });

        ui.add_space(16.0);

        let Some(keyword) = &self.applied_keyword else {
            ui.label(RichText::new("搜索结果：0.00 元").size(18.0).color(theme.warning_color));
            return;
        };
        let hits = search(&self.records, keyword);
        ui.label(
            RichText::new(format!("搜索「{keyword}」总支出：{}", format_money(total(&hits))))
                .size(18.0)
                .color(theme.warning_color),
        );
        ui.add_space(8.0);
        card(ui, theme, layout, |ui| record_list(ui, &hits, theme, "search_results"));
    }

    fn show_records_tab(&mut self, ui: &mut egui::Ui, theme: &Theme, layout: &LayoutConfig) {
        ui.label(
            RichText::new(format!("总支出：{}", format_money(total(&self.records))))
                .size(18.0)
                .color(theme.danger_color),
        );
        ui.add_space(8.0);

        let mut delete = None;
        let mut confirm = None;
        card(ui, theme, layout, |ui| {
            if self.records.is_empty() {
                ui.label(RichText::new("暂无记录").size(15.0).color(theme.text_secondary));
                return;
            }
            egui::ScrollArea::vertical()
                .id_salt("all_records")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    egui::Grid::new("all_records_grid")
                        .striped(true)
                        .spacing([18.0, 8.0])
                        .show(ui, |ui| {
                            for (display_index, record) in self.records.iter().rev().enumerate() {
                                record_row(ui, record, theme);
                                if self.pending_delete == Some(display_index) {
                                    ui.horizontal(|ui| {
                                        if ui.add(primary_button("确认", theme.danger_color)).clicked() {
                                            delete = Some(display_index);
                                        }
                                        if ui.button("取消").clicked() {
                                            confirm = Some(None);
                                        }
                                    });
                                } else if ui
                                    .add(
                                        egui::Button::new(
                                            RichText::new("删除").size(12.0).color(theme.danger_color),
                                        )
                                        .fill(Color32::TRANSPARENT)
                                        .stroke(Stroke::new(1.0, theme.danger_color))
                                        .corner_radius(CornerRadius::same(6)),
                                    )
                                    .clicked()
                                {
                                    confirm = Some(Some(display_index));
                                }
                                ui.end_row();
                            }
                        });
                });
        });

        if let Some(pending) = confirm {
            self.pending_delete = pending;
        }
        if let Some(display_index) = delete {
            self.delete_record(display_index);
        }
    }

    fn show_stats_tab(&mut self, ui: &mut egui::Ui, theme: &Theme, layout: &LayoutConfig) {
        ui.horizontal(|ui| {
            for granularity in [Granularity::Monthly, Granularity::Daily, Granularity::Yearly] {
                ui.selectable_value(&mut self.granularity, granularity, granularity.label());
            }

            ui.add_space(24.0);
            ui.label(RichText::new("分类").color(theme.text_secondary));
            let selected = match &self.stats_category {
                CategoryFilter::All => "全部".to_string(),
                CategoryFilter::Only(category) => category.clone(),
            };
            egui::ComboBox::from_id_salt("stats_category")
                .width(90.0)
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.stats_category, CategoryFilter::All, "全部");
                    for category in &self.config.categories {
                        ui.selectable_value(
                            &mut self.stats_category,
                            CategoryFilter::Only(category.clone()),
                            category.as_str(),
                        );
                    }
                });
        });
        ui.add_space(12.0);

        let mut buckets = aggregate(&self.records, self.granularity, &self.stats_category);
        let sum: f64 = buckets.iter().map(|b| b.total).sum();
        // 图表从左到右按时间先后
        if self.granularity != Granularity::Monthly {
            buckets.reverse();
        }
        let title = match self.granularity {
            Granularity::Monthly => format!("{}年每月支出", Local::now().year()),
            Granularity::Daily => "最近20天支出".to_string(),
            Granularity::Yearly => "最近10年支出".to_string(),
        };
        card(ui, theme, layout, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(title).size(16.0).color(theme.text_primary));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(format_money(sum))
                            .size(16.0)
                            .color(theme.green_color),
                    );
                });
            });
            ui.add_space(8.0);
            draw_bar_chart(ui, &buckets, theme);
        });

        ui.add_space(16.0);

        let (window, window_label) = match self.granularity {
            Granularity::Monthly => (TimeFilter::ThisYear, "今年"),
            Granularity::Daily => (TimeFilter::ThisMonth, "本月"),
            Granularity::Yearly => (TimeFilter::All, "全部"),
        };
        let shares = category_totals(&filter_by_time(&self.records, window, ""));
        card(ui, theme, layout, |ui| {
            ui.label(
                RichText::new(format!("{window_label}分类占比"))
                    .size(16.0)
                    .color(theme.text_primary),
            );
            ui.add_space(8.0);
            draw_pie_chart(ui, &shares, theme);
        });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // 消息计时器
        if self.message_timer > 0.0 {
            self.message_timer -= ctx.input(|i| i.unstable_dt);
            if self.message_timer <= 0.0 {
                self.message.clear();
            }
            ctx.request_repaint();
        }

        let theme = Theme::default();
        let layout = LayoutConfig::default();

        let mut style = (*ctx.style()).clone();
        style.visuals.widgets.inactive.bg_fill = theme.input_bg;
        style.visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, Color32::from_rgb(60, 65, 75));
        style.visuals.widgets.inactive.corner_radius = CornerRadius::same(8);
        style.visuals.widgets.hovered.bg_fill = Color32::from_rgb(55, 60, 70);
        style.visuals.widgets.active.bg_fill = Color32::from_rgb(50, 55, 65);
        style.visuals.selection.bg_fill = theme.accent_color;
        style.visuals.extreme_bg_color = theme.input_bg;
        ctx.set_style(style);

        // ===== 底部消息栏 =====
        egui::TopBottomPanel::bottom("message_panel")
            .frame(
                egui::Frame::default()
                    .fill(theme.bg_color)
                    .inner_margin(egui::Margin::symmetric(layout.panel_margin as i8, 10)),
            )
            .show(ctx, |ui| {
                let color = if self.message_is_error {
                    theme.danger_color
                } else {
                    theme.green_color
                };
                ui.label(RichText::new(&self.message).size(14.0).color(color));
            });

        egui::CentralPanel::default()
            .frame(
                egui::Frame::default()
                    .fill(theme.bg_color)
                    .inner_margin(layout.panel_margin as i8),
            )
            .show(ctx, |ui| {
                let content_width = layout.content_width.min(ui.available_width());
                let side_margin = ((ui.available_width() - content_width) / 2.0).max(0.0);

                ui.horizontal(|ui| {
                    ui.add_space(side_margin);
                    ui.vertical(|ui| {
                        ui.set_width(content_width);

                        // ===== 顶部标题区 =====
                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new("高级记账本")
                                    .font(FontId::proportional(28.0))
                                    .color(theme.text_primary),
                            );
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                ui.label(
                                    RichText::new(format_money(total(&self.records)))
                                        .font(FontId::proportional(22.0))
                                        .color(theme.green_color),
                                );
                                ui.label(
                                    RichText::new(format!("共 {} 笔 · 累计支出", self.records.len()))
                                        .font(FontId::proportional(13.0))
                                        .color(theme.text_secondary),
                                );
                            });
                        });
                        ui.add_space(16.0);

                        // ===== 标签页 =====
                        ui.horizontal(|ui| {
                            for tab in Tab::ALL {
                                let selected = self.tab == tab;
                                let text = RichText::new(tab.label()).size(15.0).color(if selected {
                                    Color32::WHITE
                                } else {
                                    theme.text_secondary
                                });
                                let button = egui::Button::new(text)
                                    .fill(if selected { theme.accent_color } else { theme.card_color })
                                    .corner_radius(CornerRadius::same(8));
                                if ui.add_sized([96.0, 34.0], button).clicked() {
                                    self.tab = tab;
                                    self.pending_delete = None;
                                }
                            }
                        });
                        ui.add_space(16.0);

                        match self.tab {
                            Tab::Entry => self.show_entry_tab(ui, &theme, &layout),
                            Tab::Search => self.show_search_tab(ui, &theme, &layout),
                            Tab::Records => self.show_records_tab(ui, &theme, &layout),
                            Tab::Stats => {
                                egui::ScrollArea::vertical()
                                    .id_salt("stats_scroll")
                                    .auto_shrink([false, false])
                                    .show(ui, |ui| self.show_stats_tab(ui, &theme, &layout));
                            }
                        }
                    });
                });
            });
    }
}
