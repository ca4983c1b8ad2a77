use crate::auth::{AuthState, AuthStatus};
use crate::chart::{ChartPoint, Dimension, category_color, tick_interval};
use crate::dates::{format_display_date, format_range_label, format_short_date, parse_date};
use crate::edit_form::{EditForm, FormStep};
use crate::errors::ErrorKind;
use crate::forms::FieldErrors;
use crate::models::{
    CONTEXT_SCORE_MAX, CONTEXT_SCORE_MIN, EnergyLevels, Nutrition, PhysicalActivity, SCORE_MAX,
    SCORE_MIN, SocialInteractions, TimeOutdoors,
};
use crate::range::Preset;
use crate::range_view::{RangeView, ViewStatus};
use crate::spending::{SpendingError, SpendingView};
use std::fmt::Write;
use std::time::Instant;

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn render_page(title: &str, auth: &AuthState, body: &str) -> String {
    LAYOUT_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{NAV}}", &render_nav(auth))
        .replace("{{BODY}}", body)
}

fn render_nav(auth: &AuthState) -> String {
    match auth.status {
        AuthStatus::Authenticated => {
            let email = auth.email.as_deref().map(escape_html).unwrap_or_default();
            format!(
                r#"<a href="/timespending">Time spending</a>
      <a href="/energy/levels">Energy levels</a>
      <span class="nav-user">{email}</span>
      <form method="post" action="/auth/logout"><button type="submit" class="link-btn">Sign out</button></form>"#
            )
        }
        _ => r#"<a href="/auth">Sign in</a>"#.to_string(),
    }
}

pub fn render_landing(auth: &AuthState) -> String {
    let cta = if auth.is_authenticated() {
        r#"<a class="cta" href="/energy/levels/edit">Track today</a>"#
    } else {
        r#"<a class="cta" href="/auth">Get started</a>"#
    };
    let body = format!(
        r#"<section class="card hero">
    <h1>Energy Journal</h1>
    <p class="subtitle">Where does your time flow, and how does it feel?</p>
    {cta}
  </section>"#
    );
    render_page("Energy Journal", auth, &body)
}

/// Shown while the stored session is still being checked.
pub fn render_pending(auth: &AuthState) -> String {
    render_page(
        "Checking session",
        auth,
        r#"<meta http-equiv="refresh" content="1" />
  <section class="card"><p class="muted">Checking your session...</p></section>"#,
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct AuthPage {
    pub login_email: String,
    pub login_errors: FieldErrors,
    pub login_feedback: Option<Feedback>,
    pub signup_email: String,
    pub signup_errors: FieldErrors,
    pub signup_feedback: Option<Feedback>,
}

fn field_error(id: &str, error: Option<&'static str>) -> String {
    error
        .map(|message| format!(r#"<p id="{id}" class="field-error" role="alert">{message}</p>"#))
        .unwrap_or_default()
}

fn render_feedback(feedback: &Option<Feedback>) -> String {
    match feedback {
        Some(feedback) => {
            let class = if feedback.success { "feedback-success" } else { "feedback-error" };
            format!(
                r#"<div class="feedback {class}" role="status">{}</div>"#,
                escape_html(&feedback.message)
            )
        }
        None => String::new(),
    }
}

pub fn render_auth(auth: &AuthState, page: &AuthPage) -> String {
    let body = format!(
        r#"<section class="auth-grid">
    <form class="card" method="post" action="/auth/login" novalidate>
      <h2>Sign in</h2>
      {login_feedback}
      <label for="login-email">Email</label>
      <input id="login-email" name="email" type="email" autocomplete="email" value="{login_email}" />
      {login_email_error}
      <label for="login-password">Password</label>
      <input id="login-password" name="password" type="password" autocomplete="current-password" />
      {login_password_error}
      <button type="submit">Sign in</button>
    </form>
    <form class="card" method="post" action="/auth/signup" novalidate>
      <h2>Create account</h2>
      {signup_feedback}
      <label for="signup-email">Email</label>
      <input id="signup-email" name="email" type="email" autocomplete="email" value="{signup_email}" />
      {signup_email_error}
      <label for="signup-password">Password</label>
      <input id="signup-password" name="password" type="password" autocomplete="new-password" />
      {signup_password_error}
      <label for="signup-confirm">Confirm password</label>
      <input id="signup-confirm" name="confirm_password" type="password" autocomplete="new-password" />
      {signup_confirm_error}
      <button type="submit">Sign up</button>
    </form>
  </section>"#,
        login_feedback = render_feedback(&page.login_feedback),
        login_email = escape_html(&page.login_email),
        login_email_error = field_error("login-email-error", page.login_errors.email),
        login_password_error = field_error("login-password-error", page.login_errors.password),
        signup_feedback = render_feedback(&page.signup_feedback),
        signup_email = escape_html(&page.signup_email),
        signup_email_error = field_error("signup-email-error", page.signup_errors.email),
        signup_password_error = field_error("signup-password-error", page.signup_errors.password),
        signup_confirm_error =
            field_error("signup-confirm-error", page.signup_errors.confirm_password),
    );
    render_page("Sign in", auth, &body)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    MissingToken,
    Activated,
    Failed,
}

pub fn render_activate(auth: &AuthState, outcome: ActivationOutcome) -> String {
    let status = match outcome {
        ActivationOutcome::MissingToken => {
            r#"<div class="feedback feedback-error">This activation link is invalid or has expired.</div>"#
        }
        ActivationOutcome::Failed => {
            r#"<div class="feedback feedback-error">Unable to activate your account. The link may be invalid or has expired.</div>"#
        }
        ActivationOutcome::Activated => {
            r#"<meta http-equiv="refresh" content="5; url=/auth" />
      <div class="feedback feedback-success">Your account has been activated successfully.</div>
      <p class="muted">Redirecting to login...</p>"#
        }
    };
    let body = format!(
        r#"<section class="card">
    <h1>Account Activation</h1>
    <div role="status" aria-live="polite">
      {status}
    </div>
  </section>"#
    );
    render_page("Account Activation", auth, &body)
}

fn chart_x(index: usize, count: usize) -> f64 {
    if count <= 1 {
        return CHART_WIDTH / 2.0;
    }
    CHART_PAD + index as f64 * (CHART_WIDTH - 2.0 * CHART_PAD) / (count - 1) as f64
}

fn chart_y(value: i64) -> f64 {
    let span = (SCORE_MAX - SCORE_MIN) as f64;
    CHART_PAD + (SCORE_MAX - value) as f64 / span * (CHART_HEIGHT - 2.0 * CHART_PAD)
}

const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 260.0;
const CHART_PAD: f64 = 32.0;

/// SVG trend chart. Days without an entry break the line.
pub fn render_line_chart(points: &[ChartPoint]) -> String {
    let mut svg = format!(
        r#"<svg class="trend-chart" viewBox="0 0 {CHART_WIDTH} {CHART_HEIGHT}" role="img" aria-label="Energy trends">"#
    );

    for level in [0, 5, 10] {
        let y = chart_y(level);
        let _ = write!(
            svg,
            r#"<line class="grid" x1="{CHART_PAD}" x2="{x2}" y1="{y:.1}" y2="{y:.1}" /><text class="axis" x="4" y="{ty:.1}">{level}</text>"#,
            x2 = CHART_WIDTH - CHART_PAD,
            ty = y + 4.0,
        );
    }

    let interval = tick_interval(points.len(), false);
    for (index, point) in points.iter().enumerate() {
        if index % (interval + 1) != 0 {
            continue;
        }
        let label = parse_date(&point.date)
            .map(format_short_date)
            .unwrap_or_else(|| point.date.clone());
        let _ = write!(
            svg,
            r#"<text class="axis" text-anchor="middle" x="{x:.1}" y="{y:.1}">{label}</text>"#,
            x = chart_x(index, points.len()),
            y = CHART_HEIGHT - 8.0,
        );
    }

    for dimension in Dimension::ALL {
        let color = dimension.color();
        let mut segment: Vec<(f64, f64)> = Vec::new();
        let mut segments = Vec::new();
        for (index, point) in points.iter().enumerate() {
            match point.value(dimension) {
                Some(value) => segment.push((chart_x(index, points.len()), chart_y(value))),
                None if !segment.is_empty() => segments.push(std::mem::take(&mut segment)),
                None => {}
            }
        }
        if !segment.is_empty() {
            segments.push(segment);
        }

        for segment in segments {
            if let [(x, y)] = segment.as_slice() {
                let _ = write!(svg, r#"<circle cx="{x:.1}" cy="{y:.1}" r="3" fill="{color}" />"#);
                continue;
            }
            let coords: Vec<String> = segment
                .iter()
                .map(|(x, y)| format!("{x:.1},{y:.1}"))
                .collect();
            let _ = write!(
                svg,
                r#"<polyline fill="none" stroke="{color}" stroke-width="2.5" points="{}" />"#,
                coords.join(" ")
            );
        }
    }

    svg.push_str("</svg>");
    svg
}

fn render_legend() -> String {
    Dimension::ALL
        .iter()
        .map(|dimension| {
            format!(
                r#"<span class="legend-item"><span class="swatch" style="background:{}"></span>{}</span>"#,
                dimension.color(),
                dimension.label()
            )
        })
        .collect::<Vec<_>>()
        .join("")
}

pub fn render_range_page(auth: &AuthState, view: &RangeView) -> String {
    let selection = &view.selection;
    let presets: String = Preset::SHORTCUTS
        .iter()
        .map(|preset| {
            let active = if *preset == selection.preset { " preset-active" } else { "" };
            format!(
                r#"<a class="preset{active}" href="/energy/levels?preset={label}" aria-pressed="{pressed}">{label}</a>"#,
                label = preset.label(),
                pressed = *preset == selection.preset,
            )
        })
        .collect();

    let warning = if selection.clamp_warning {
        r#"<p class="clamp-warning" role="status">Range limited to 30 days</p>"#
    } else {
        ""
    };

    let content = match view.status {
        ViewStatus::Idle | ViewStatus::Loading => {
            r#"<p class="muted">Loading energy levels...</p>"#.to_string()
        }
        ViewStatus::Success => format!(
            r#"<div class="legend">{}</div>{}"#,
            render_legend(),
            render_line_chart(&view.chart_data())
        ),
        ViewStatus::Empty => r#"<div class="empty-state">
      <p>No energy levels recorded for these dates.</p>
      <a class="cta" href="/energy/levels/edit">Track today</a>
    </div>"#
            .to_string(),
        ViewStatus::Error(kind) => format!(
            r#"<div class="error-state" role="alert">
      <p>{}</p>
      <a class="cta" href="/energy/levels?refresh=1">Try again</a>
    </div>"#,
            match kind {
                ErrorKind::Offline => "You are offline",
                ErrorKind::Generic => "Could not load your energy levels.",
            }
        ),
    };

    let body = format!(
        r#"<header class="page-header">
    <div>
      <h1>Energy Levels</h1>
      <p class="subtitle">Track how your physical, mental, and emotional energy evolves over time.</p>
    </div>
    <a class="cta" href="/energy/levels/edit">Track Today</a>
  </header>
  <section class="card">
    <div class="presets">{presets}</div>
    <div class="range-inputs">
      <form method="get" action="/energy/levels">
        <input type="hidden" name="field" value="from" />
        <label for="energy-range-from">FROM</label>
        <input id="energy-range-from" name="from" type="date" value="{from}" onchange="this.form.submit()" />
        <span class="date-display">{from_display}</span>
      </form>
      <span aria-hidden="true">&rarr;</span>
      <form method="get" action="/energy/levels">
        <input type="hidden" name="field" value="to" />
        <label for="energy-range-to">TO</label>
        <input id="energy-range-to" name="to" type="date" value="{to}" onchange="this.form.submit()" />
        <span class="date-display">{to_display}</span>
      </form>
      <a class="refresh-btn" href="/energy/levels?refresh=1">Refresh</a>
    </div>
    {warning}
  </section>
  <section class="card" aria-busy="{busy}">
    <h2>Your Energy Trends</h2>
    <p class="subtitle">{range_label} &middot; {day_count} days</p>
    {content}
  </section>"#,
        from = selection.from,
        to = selection.to,
        from_display = format_display_date(selection.from),
        to_display = format_display_date(selection.to),
        range_label = format_range_label(selection.from, selection.to),
        day_count = selection.day_count(),
        busy = view.status == ViewStatus::Loading,
    );
    render_page("Energy Levels", auth, &body)
}

fn render_slider(name: &str, label: &str, color: &str, value: i64, min: i64, max: i64, disabled: bool) -> String {
    let disabled = if disabled { " disabled" } else { "" };
    format!(
        r#"<div class="energy-section">
      <label for="{name}" style="color:{color}">{label}</label>
      <input id="{name}" name="{name}" type="range" min="{min}" max="{max}" value="{value}"{disabled} />
      <output for="{name}">{value}</output>
    </div>"#
    )
}

fn render_select<T: Copy + PartialEq>(
    name: &str,
    label: &str,
    options: &[T],
    selected: Option<T>,
    wire: fn(T) -> &'static str,
    text: fn(T) -> &'static str,
    disabled: bool,
) -> String {
    let mut html = format!(
        r#"<div class="context-select"><label for="{name}">{label}</label><select id="{name}" name="{name}"{}>"#,
        if disabled { " disabled" } else { "" }
    );
    let none_selected = if selected.is_none() { " selected" } else { "" };
    let _ = write!(html, r#"<option value=""{none_selected}>&mdash;</option>"#);
    for option in options {
        let mark = if Some(*option) == selected { " selected" } else { "" };
        let _ = write!(
            html,
            r#"<option value="{}"{mark}>{}</option>"#,
            wire(*option),
            text(*option)
        );
    }
    html.push_str("</select></div>");
    html
}

fn hidden(name: &str, value: impl std::fmt::Display) -> String {
    format!(
        r#"<input type="hidden" name="{name}" value="{}" />"#,
        escape_html(&value.to_string())
    )
}

fn hidden_option<T: std::fmt::Display>(name: &str, value: Option<T>) -> String {
    value.map(|value| hidden(name, value)).unwrap_or_default()
}

fn render_context_hidden(draft: &EnergyLevels) -> String {
    [
        hidden_option("sleep_quality", draft.sleep_quality),
        hidden_option("stress_level", draft.stress_level),
        hidden_option("physical_activity", draft.physical_activity.map(PhysicalActivity::as_str)),
        hidden_option("nutrition", draft.nutrition.map(Nutrition::as_str)),
        hidden_option(
            "social_interactions",
            draft.social_interactions.map(SocialInteractions::as_str),
        ),
        hidden_option("time_outdoors", draft.time_outdoors.map(TimeOutdoors::as_str)),
        hidden_option("notes", draft.notes.as_deref()),
    ]
    .concat()
}

pub fn render_edit_page(auth: &AuthState, form: &EditForm, now: Instant) -> String {
    let draft = &form.draft;
    let date_key = escape_html(&draft.date);

    let badge = if form.has_existing {
        r#"<div class="status-badge" aria-live="polite">Existing levels loaded for this date, adjust and save to update</div>"#
    } else {
        ""
    };
    let load_error = form
        .load_error
        .map(|message| format!(r#"<p class="load-error">{message}</p>"#))
        .unwrap_or_default();
    let save_error = form
        .save_error
        .map(|message| {
            format!(r#"<p class="save-error" role="alert">{message} <button type="submit" name="action" value="save">Retry</button></p>"#)
        })
        .unwrap_or_default();
    let toast = form
        .toast(now)
        .and_then(|saved| parse_date(&saved.date))
        .map(|date| {
            format!(
                r#"<div class="toast" role="status">Energy levels saved for {}, {}</div>"#,
                format_short_date(date),
                chrono::Datelike::year(&date)
            )
        })
        .unwrap_or_default();

    let scores_disabled = form.scores_disabled();
    let context_disabled = form.context_disabled();

    let step_body = match form.step {
        FormStep::Scores => format!(
            r#"{physical}{mental}{emotional}
      {context_hidden}
      <div class="actions">
        <button type="submit" name="action" value="next"{next_disabled}>Next Step &rarr;</button>
        <a class="cancel" href="/energy/levels">Cancel</a>
      </div>"#,
            physical = render_slider("physical", "Physical", Dimension::Physical.color(), draft.physical, SCORE_MIN, SCORE_MAX, scores_disabled),
            mental = render_slider("mental", "Mental", Dimension::Mental.color(), draft.mental, SCORE_MIN, SCORE_MAX, scores_disabled),
            emotional = render_slider("emotional", "Emotional", Dimension::Emotional.color(), draft.emotional, SCORE_MIN, SCORE_MAX, scores_disabled),
            context_hidden = render_context_hidden(draft),
            next_disabled = if scores_disabled { " disabled" } else { "" },
        ),
        FormStep::Context => format!(
            r#"<h2>Daily Context</h2>
      <p class="subtitle">Help us understand what shaped your energy today</p>
      {scores_hidden}
      {sleep}{stress}
      {activity}{nutrition}{social}{outdoors}
      <label for="notes">Notes</label>
      <textarea id="notes" name="notes"{notes_disabled}>{notes}</textarea>
      <div class="actions">
        <button type="submit" name="action" value="save"{save_disabled}>{save_label}</button>
        <button type="submit" name="action" value="back" class="link-btn">Back</button>
      </div>"#,
            scores_hidden = [
                hidden("physical", draft.physical),
                hidden("mental", draft.mental),
                hidden("emotional", draft.emotional),
            ]
            .concat(),
            sleep = render_slider(
                "sleep_quality",
                "Sleep Quality",
                Dimension::Mental.color(),
                draft.sleep_quality.unwrap_or(crate::edit_form::DEFAULT_CONTEXT_LEVEL),
                CONTEXT_SCORE_MIN,
                CONTEXT_SCORE_MAX,
                context_disabled,
            ),
            stress = render_slider(
                "stress_level",
                "Stress Level",
                Dimension::Physical.color(),
                draft.stress_level.unwrap_or(crate::edit_form::DEFAULT_CONTEXT_LEVEL),
                CONTEXT_SCORE_MIN,
                CONTEXT_SCORE_MAX,
                context_disabled,
            ),
            activity = render_select(
                "physical_activity",
                "Physical activity",
                PhysicalActivity::ALL,
                draft.physical_activity,
                PhysicalActivity::as_str,
                PhysicalActivity::label,
                context_disabled,
            ),
            nutrition = render_select(
                "nutrition",
                "Nutrition",
                Nutrition::ALL,
                draft.nutrition,
                Nutrition::as_str,
                Nutrition::label,
                context_disabled,
            ),
            social = render_select(
                "social_interactions",
                "Social interactions",
                SocialInteractions::ALL,
                draft.social_interactions,
                SocialInteractions::as_str,
                SocialInteractions::label,
                context_disabled,
            ),
            outdoors = render_select(
                "time_outdoors",
                "Time outdoors",
                TimeOutdoors::ALL,
                draft.time_outdoors,
                TimeOutdoors::as_str,
                TimeOutdoors::label,
                context_disabled,
            ),
            notes = escape_html(draft.notes.as_deref().unwrap_or_default()),
            notes_disabled = if context_disabled { " disabled" } else { "" },
            save_disabled = if context_disabled { " disabled" } else { "" },
            save_label = if form.status == crate::edit_form::FormStatus::Saving {
                "Saving..."
            } else {
                "Save"
            },
        ),
    };

    let step_number = match form.step {
        FormStep::Scores => 1,
        FormStep::Context => 2,
    };

    let body = format!(
        r#"{toast}<section class="card edit-card">
    <a class="back" href="/energy/levels">&larr; Back</a>
    <h1>Edit Energy Levels</h1>
    <p class="subtitle">Save and return to refreshed trend chart.</p>
    <p class="step-indicator">Step {step_number} of 2</p>
    <form method="get" action="/energy/levels/edit" class="date-picker">
      <label for="energy-date">DATE</label>
      <input id="energy-date" name="date" type="date" value="{date_key}" onchange="this.form.submit()" aria-label="Date" />
      <span class="date-display">{date_display}</span>
    </form>
    {load_error}
    {badge}
    <form method="post" action="/energy/levels/edit">
      <input type="hidden" name="date" value="{date_key}" />
      {step_body}
      {save_error}
    </form>
  </section>"#,
        date_display = format_display_date(form.date),
    );
    render_page("Edit Energy Levels", auth, &body)
}

pub fn render_spending(auth: &AuthState, view: &SpendingView) -> String {
    let content = match &view.error {
        Some(SpendingError::Invalid(message)) => {
            format!(r#"<div class="error-state" role="alert"><p>{message}</p></div>"#)
        }
        Some(SpendingError::Failed { kind, detail }) => format!(
            r#"<div class="error-state" role="alert">
      <p class="error-message">{headline}</p>
      <p class="error-detail">{detail}</p>
      <a class="cta" href="/timespending?start={start}&amp;end={end}">Try again</a>
    </div>"#,
            headline = match kind {
                ErrorKind::Offline => "You are offline",
                ErrorKind::Generic => "Unable to load data",
            },
            detail = escape_html(detail),
            start = escape_html(&view.start),
            end = escape_html(&view.end),
        ),
        None if view.slices.is_empty() => {
            r#"<div class="empty-state"><p>No activities found for this period.</p></div>"#
                .to_string()
        }
        None => {
            let max = view
                .slices
                .iter()
                .map(|slice| slice.hours)
                .fold(0.0_f64, f64::max)
                .max(f64::EPSILON);
            let bars: String = view
                .slices
                .iter()
                .enumerate()
                .map(|(index, slice)| {
                    format!(
                        r#"<div class="bar-row"><span class="bar-label">{name}</span><span class="bar" style="width:{width:.1}%;background:{color}"></span><span class="bar-value">{hours:.1}h</span></div>"#,
                        name = escape_html(&slice.name),
                        width = slice.hours / max * 100.0,
                        color = category_color(&slice.name, index),
                        hours = slice.hours,
                    )
                })
                .collect();
            format!(
                r#"<div class="stats-summary">
      <div class="stat"><span class="stat-value">{total:.1}</span><span class="stat-label">hours tracked</span></div>
      <div class="stat"><span class="stat-value">{count}</span><span class="stat-label">categories</span></div>
      <div class="stat"><span class="stat-value">{top}</span><span class="stat-label">top activity</span></div>
    </div>
    <div class="bars">{bars}</div>"#,
                total = view.total_hours,
                count = view.slices.len(),
                top = escape_html(&view.slices[0].name),
            )
        }
    };

    let body = format!(
        r#"<header class="page-header">
    <div>
      <h1>Energy Journal</h1>
      <p class="subtitle">Where does your time flow?</p>
    </div>
  </header>
  <section class="card">
    <form method="get" action="/timespending" class="range-inputs">
      <label for="start-date">From</label>
      <input id="start-date" name="start" type="date" value="{start}" />
      <label for="end-date">To</label>
      <input id="end-date" name="end" type="date" value="{end}" />
      <button type="submit" class="refresh-btn">Refresh</button>
    </form>
  </section>
  <section class="card">
    {content}
  </section>"#,
        start = escape_html(&view.start),
        end = escape_html(&view.end),
    );
    render_page("Time Spending", auth, &body)
}

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --bg: #f5f0e8;
      --ink: #2b2a28;
      --muted: #7a746b;
      --card: rgba(255, 255, 255, 0.86);
      --amber: #e8a445;
      --terracotta: #c4826d;
      --sage: #8fa58b;
      --seafoam: #7eb8b3;
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.14);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, #f5d3a7, transparent 60%), var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
    }

    nav {
      display: flex;
      gap: 18px;
      align-items: center;
      justify-content: flex-end;
      padding: 16px 28px;
    }

    nav a, .link-btn {
      color: var(--ink);
      background: none;
      border: none;
      font: inherit;
      cursor: pointer;
      text-decoration: none;
    }

    main {
      width: min(900px, 100%);
      margin: 0 auto;
      padding: 12px 18px 48px;
      display: grid;
      gap: 20px;
    }

    .card {
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 28px;
      display: grid;
      gap: 12px;
    }

    .auth-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
      gap: 20px;
    }

    .page-header {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    .subtitle, .muted {
      color: var(--muted);
    }

    .cta, button {
      display: inline-block;
      background: var(--amber);
      color: #fff;
      border: none;
      border-radius: 999px;
      padding: 10px 20px;
      text-decoration: none;
      cursor: pointer;
    }

    .presets, .range-inputs, .actions, .legend {
      display: flex;
      gap: 12px;
      align-items: center;
      flex-wrap: wrap;
    }

    .preset {
      padding: 6px 14px;
      border-radius: 999px;
      border: 1px solid var(--amber);
      color: var(--ink);
      text-decoration: none;
    }

    .preset-active {
      background: var(--amber);
      color: #fff;
    }

    .clamp-warning, .field-error, .load-error, .save-error, .feedback-error {
      color: var(--terracotta);
    }

    .feedback-success, .status-badge {
      color: var(--sage);
    }

    .toast {
      position: fixed;
      bottom: 24px;
      right: 24px;
      background: var(--ink);
      color: #fff;
      padding: 12px 18px;
      border-radius: 12px;
    }

    .trend-chart {
      width: 100%;
      height: auto;
    }

    .trend-chart .grid {
      stroke: rgba(43, 42, 40, 0.1);
    }

    .trend-chart .axis {
      fill: var(--muted);
      font-size: 11px;
    }

    .swatch {
      display: inline-block;
      width: 10px;
      height: 10px;
      border-radius: 50%;
      margin-right: 6px;
    }

    .bar-row {
      display: grid;
      grid-template-columns: 120px 1fr 60px;
      gap: 10px;
      align-items: center;
      margin: 6px 0;
    }

    .bar {
      height: 14px;
      border-radius: 7px;
    }

    .stats-summary {
      display: flex;
      gap: 24px;
    }

    .stat {
      display: grid;
    }

    .stat-value {
      font-size: 1.6rem;
      font-weight: 600;
    }
  </style>
</head>
<body>
  <nav>
    <a href="/">Energy Journal</a>
    {{NAV}}
  </nav>
  <main>
  {{BODY}}
  </main>
</body>
</html>
"#;
