//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize)
//! - ClinicClient for orchestration
//! - DisplayState for rendering
//!
//! The App converts terminal events to SurfaceEvents, sends them to the
//! embedded Clinic, applies the returned ClinicMessages to DisplayState,
//! and renders one screen per frame. The carousel countdown and the
//! particle field are driven here, off the frame delta.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use clinic_core::{
    AuthField, AuthForm, BookingForm, ChatSpeaker, ClinicMessage, ClinicState, DashboardTab,
    NotifyLevel, Role, View, QUICK_QUESTIONS,
};
use unicode_width::UnicodeWidthStr;

use crate::carousel::{Carousel, SLIDES};
use crate::client::ClinicClient;
use crate::display::DisplayState;
use crate::forms::{FormState, TextField};
use crate::particles::ParticleField;
use crate::theme;

/// Chat panel width (columns)
const CHAT_WIDTH: u16 = 42;

/// Static doctor roster for the admin dashboard
const DOCTOR_ROSTER: &[&str] = &[
    "Dr. Priya Sharma - Panchakarma",
    "Dr. Rajesh Kumar - Rasayana therapy",
    "Dr. Anita Patel - Ayurvedic nutrition",
];

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// Goodbye message to show on exit
    goodbye_message: Option<String>,

    // === Clinic Integration ===
    /// Client for communicating with the embedded Clinic
    clinic: ClinicClient,
    /// Display state derived from ClinicMessages
    display: DisplayState,

    // === Input State ===
    /// Auth form fields (rebuilt on every layout change)
    auth_form: FormState,
    /// Booking form fields
    booking_form: FormState,
    /// Passcode prompt input
    otp_input: String,
    /// Chat input buffer
    chat_input: String,
    /// Whether the chat widget is open (local echo of the core flag)
    chat_open: bool,
    /// Selected row in the doctor appointment list
    selected_appointment: usize,

    // === Decoration ===
    /// Landing carousel
    carousel: Carousel,
    /// Landing particle field
    particles: ParticleField,

    // === Misc State ===
    /// Last frame time (for animations)
    last_frame: Instant,
}

impl App {
    /// Create a new App instance
    pub fn new() -> anyhow::Result<Self> {
        let clinic = ClinicClient::new();
        let config = clinic.config();

        let carousel = Carousel::new(
            config.carousel_slide_count,
            Duration::from_millis(config.carousel_interval_ms),
        );
        let particles = ParticleField::new(config.particle_count, &mut rand::thread_rng());

        let mut display = DisplayState::new();
        display.appointments = clinic.appointments();

        Ok(Self {
            running: true,
            goodbye_message: None,
            clinic,
            display,
            auth_form: FormState::default(),
            booking_form: Self::fresh_booking_form(),
            otp_input: String::new(),
            chat_input: String::new(),
            chat_open: false,
            selected_appointment: 0,
            carousel,
            particles,
            last_frame: Instant::now(),
        })
    }

    /// Get the goodbye message for display after the TUI closes
    pub fn goodbye(&self) -> Option<&str> {
        self.goodbye_message.as_deref()
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        // ~10 FPS is plenty for terminal-style animation
        let frame_duration = Duration::from_millis(100);

        let mut event_stream = EventStream::new();

        self.clinic.start().await?;
        self.clinic.connect().await?;

        // Render the first frame immediately so the user sees the UI
        self.render(terminal)?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        match event {
                            // Only handle Press events (not Release or Repeat)
                            Event::Key(key) if key.kind == KeyEventKind::Press => {
                                self.handle_key(key).await;
                            }
                            // Resize is picked up by the next draw
                            Event::Resize(..) => {}
                            _ => {}
                        }
                    }
                }

                // Frame tick
                _ = tokio::time::sleep(frame_duration) => {}
            }

            // Publish any chat reply whose composing delay elapsed
            self.clinic.poll_reply().await;

            // Receive and process messages from the Clinic
            self.process_messages();

            // Update animations and display timers
            self.update();

            // Render
            self.render(terminal)?;

            // Check for shutdown
            if self.display.clinic_state == ClinicState::ShuttingDown {
                self.goodbye_message = self.display.quit_message.clone();
                self.running = false;
            }

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                tokio::time::sleep(frame_duration - elapsed).await;
            }
        }

        Ok(())
    }

    /// Process all pending messages from the Clinic
    fn process_messages(&mut self) {
        for msg in self.clinic.recv_all() {
            match &msg {
                ClinicMessage::AuthFormLayout { visible_fields, .. } => {
                    self.rebuild_auth_form(visible_fields);
                }
                ClinicMessage::ShowView { view } => {
                    if view.is_dashboard() {
                        self.booking_form = Self::fresh_booking_form();
                        self.selected_appointment = 0;
                    }
                }
                ClinicMessage::OtpPromptClosed => {
                    self.otp_input.clear();
                }
                _ => {}
            }

            self.display.apply_message(msg);
        }
    }

    /// Update animations and state
    fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;

        self.display.update(delta);

        // The carousel and particles only animate on the landing screen
        if self.display.view == View::Landing {
            self.carousel.update(delta);
            self.particles.update(delta);
        }

        // Keep the appointment selection inside the pending list
        let pending = self.display.pending_appointments().len();
        if pending > 0 && self.selected_appointment >= pending {
            self.selected_appointment = pending - 1;
        }
    }

    // ========================================================================
    // Input handling
    // ========================================================================

    /// Handle keyboard input
    async fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            let _ = self.clinic.request_quit().await;
            return;
        }

        // The passcode prompt captures everything while open
        if self.display.otp_open {
            self.handle_otp_key(key.code).await;
            return;
        }

        // The chat widget captures everything while open
        if self.chat_open {
            self.handle_chat_key(key).await;
            return;
        }

        // F4 toggles the chat widget from any screen
        if key.code == KeyCode::F(4) {
            self.chat_open = true;
            let _ = self.clinic.set_chat_open(true).await;
            return;
        }

        match self.display.view {
            View::Landing => self.handle_landing_key(key.code).await,
            View::Auth => self.handle_auth_key(key).await,
            View::PatientDashboard | View::DoctorDashboard | View::AdminDashboard => {
                self.handle_dashboard_key(key).await;
            }
        }
    }

    /// Keys on the landing screen
    async fn handle_landing_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('1') => {
                let _ = self.clinic.request_auth(Role::Patient).await;
            }
            KeyCode::Char('2') => {
                let _ = self.clinic.request_auth(Role::Doctor).await;
            }
            KeyCode::Char('3') => {
                let _ = self.clinic.request_auth(Role::Admin).await;
            }
            // Manual carousel jumps restart the auto-advance countdown
            KeyCode::Left => self.carousel.prev(),
            KeyCode::Right => self.carousel.next(),
            KeyCode::Esc | KeyCode::Char('q') => {
                let _ = self.clinic.request_quit().await;
            }
            _ => {}
        }
    }

    /// Keys on the auth screen
    async fn handle_auth_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                let _ = self.clinic.go_landing().await;
            }
            KeyCode::Tab | KeyCode::Down => self.auth_form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.auth_form.focus_prev(),
            KeyCode::Backspace => self.auth_form.backspace(),
            KeyCode::Enter => {
                let form = self.collect_auth_form();
                let _ = self.clinic.submit_auth(form).await;
            }
            // Ctrl+T flips login <-> signup
            KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let _ = self.clinic.toggle_auth_mode().await;
            }
            KeyCode::Char(c) => self.auth_form.push_char(c),
            _ => {}
        }
    }

    /// Keys inside the passcode prompt
    async fn handle_otp_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                let _ = self.clinic.cancel_otp().await;
            }
            KeyCode::Enter => {
                let entered = std::mem::take(&mut self.otp_input);
                let _ = self.clinic.submit_otp(entered).await;
            }
            KeyCode::Backspace => {
                self.otp_input.pop();
            }
            KeyCode::Char(c) if self.otp_input.len() < 6 => {
                self.otp_input.push(c);
            }
            _ => {}
        }
    }

    /// Keys inside the chat widget
    async fn handle_chat_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.chat_open = false;
                let _ = self.clinic.set_chat_open(false).await;
            }
            KeyCode::Enter => {
                let content = std::mem::take(&mut self.chat_input);
                let _ = self.clinic.send_chat(content).await;
            }
            KeyCode::Backspace => {
                self.chat_input.pop();
            }
            KeyCode::F(n) if (1..=4).contains(&n) && self.display.quick_questions => {
                if let Some(question) = QUICK_QUESTIONS.get((n - 1) as usize) {
                    let _ = self.clinic.quick_question((*question).to_string()).await;
                }
            }
            KeyCode::Char(c) => self.chat_input.push(c),
            _ => {}
        }
    }

    /// Keys on a dashboard
    async fn handle_dashboard_key(&mut self, key: crossterm::event::KeyEvent) {
        let Some(role) = self.display.view.dashboard_role() else {
            return;
        };

        // Tab cycling
        if matches!(key.code, KeyCode::Left | KeyCode::Right)
            && !(role == Role::Patient && self.display.active_tab == Some(DashboardTab::Book))
        {
            self.cycle_tab(role, key.code == KeyCode::Right).await;
            return;
        }

        match key.code {
            KeyCode::Esc => {
                let _ = self.clinic.logout().await;
                return;
            }
            KeyCode::Tab => {
                self.cycle_tab(role, true).await;
                return;
            }
            _ => {}
        }

        match (role, self.display.active_tab) {
            (Role::Patient, Some(DashboardTab::Book)) => match key.code {
                KeyCode::Down => self.booking_form.focus_next(),
                KeyCode::Up => self.booking_form.focus_prev(),
                KeyCode::Backspace => self.booking_form.backspace(),
                KeyCode::Enter => {
                    let form = self.collect_booking_form();
                    let _ = self.clinic.submit_booking(form).await;
                }
                KeyCode::Char(c) => self.booking_form.push_char(c),
                _ => {}
            },

            (Role::Doctor, Some(DashboardTab::Appointments)) => {
                let pending: Vec<_> = self
                    .display
                    .pending_appointments()
                    .iter()
                    .map(|a| a.id)
                    .collect();
                match key.code {
                    KeyCode::Down => {
                        if !pending.is_empty() {
                            self.selected_appointment =
                                (self.selected_appointment + 1) % pending.len();
                        }
                    }
                    KeyCode::Up => {
                        if !pending.is_empty() {
                            self.selected_appointment = (self.selected_appointment
                                + pending.len()
                                - 1)
                                % pending.len();
                        }
                    }
                    KeyCode::Char('c') => {
                        if let Some(id) = pending.get(self.selected_appointment) {
                            let _ = self.clinic.confirm_appointment(*id).await;
                        }
                    }
                    KeyCode::Char('x') => {
                        if let Some(id) = pending.get(self.selected_appointment) {
                            let _ = self.clinic.cancel_appointment(*id).await;
                        }
                    }
                    _ => {}
                }
            }

            _ => {}
        }
    }

    /// Move to the adjacent dashboard tab
    async fn cycle_tab(&mut self, role: Role, forward: bool) {
        let tabs = DashboardTab::available_for(role);
        let current = self
            .display
            .active_tab
            .and_then(|tab| tabs.iter().position(|t| *t == tab))
            .unwrap_or(0);

        let next = if forward {
            (current + 1) % tabs.len()
        } else {
            (current + tabs.len() - 1) % tabs.len()
        };

        let _ = self.clinic.select_tab(tabs[next]).await;
    }

    // ========================================================================
    // Form plumbing
    // ========================================================================

    /// Rebuild the auth form for a new field layout, keeping typed values
    fn rebuild_auth_form(&mut self, visible: &[AuthField]) {
        let mut fields = vec![TextField::new("Email"), TextField::masked("Password")];
        for field in visible {
            fields.push(match field {
                AuthField::Name => TextField::new("Full Name"),
                AuthField::Phone => TextField::new("Phone"),
                AuthField::Specialization => TextField::new("Specialization"),
                AuthField::License => TextField::new("License Number"),
                AuthField::ConfirmPassword => TextField::masked("Confirm Password"),
            });
        }

        let form = Self::carry_values(&self.auth_form, FormState::new(fields));
        self.auth_form = form;
    }

    /// Copy values between forms by label
    fn carry_values(old: &FormState, mut new: FormState) -> FormState {
        let labels: Vec<&'static str> = new.fields().iter().map(|f| f.label).collect();
        for label in labels {
            let value = old.value(label);
            if !value.is_empty() {
                new = Self::with_value(new, label, &value);
            }
        }
        new
    }

    /// Set a field's value by label
    fn with_value(mut form: FormState, label: &str, value: &str) -> FormState {
        let focused = form.focused();
        if let Some(idx) = form.fields().iter().position(|f| f.label == label) {
            while form.focused() != idx {
                form.focus_next();
            }
            for c in value.chars() {
                form.push_char(c);
            }
        }
        while form.focused() != focused {
            form.focus_next();
        }
        form
    }

    /// A fresh, empty booking form
    fn fresh_booking_form() -> FormState {
        FormState::new(vec![
            TextField::new("Doctor"),
            TextField::new("Type"),
            TextField::new("Date (YYYY-MM-DD)"),
            TextField::new("Time (HH:MM)"),
            TextField::new("Symptoms"),
        ])
    }

    /// Drain the auth form into the event payload
    fn collect_auth_form(&self) -> AuthForm {
        AuthForm {
            email: self.auth_form.value("Email"),
            password: self.auth_form.value("Password"),
            name: self.auth_form.value("Full Name"),
            phone: self.auth_form.value("Phone"),
            specialization: self.auth_form.value("Specialization"),
            license: self.auth_form.value("License Number"),
            confirm_password: self.auth_form.value("Confirm Password"),
        }
    }

    /// Drain the booking form into the event payload
    fn collect_booking_form(&self) -> BookingForm {
        BookingForm {
            doctor: self.booking_form.value("Doctor"),
            appointment_type: self.booking_form.value("Type"),
            date: self.booking_form.value("Date (YYYY-MM-DD)"),
            time: self.booking_form.value("Time (HH:MM)"),
            symptoms: self.booking_form.value("Symptoms"),
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render the UI
    fn render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        terminal.draw(|frame| {
            let area = frame.area();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(area);

            match self.display.view {
                View::Landing => self.render_landing(frame, chunks[0]),
                View::Auth => self.render_auth(frame, chunks[0]),
                View::PatientDashboard | View::DoctorDashboard | View::AdminDashboard => {
                    self.render_dashboard(frame, chunks[0]);
                }
            }

            if self.chat_open {
                self.render_chat(frame, chunks[0]);
            }

            if self.display.otp_open {
                self.render_otp_prompt(frame, area);
            }

            self.render_status(frame, chunks[1]);
        })?;

        Ok(())
    }

    /// Landing screen: particles, banner, carousel, role buttons
    fn render_landing(&self, frame: &mut Frame<'_>, area: Rect) {
        // Particle field first, behind everything else
        let buf = frame.buffer_mut();
        for particle in self.particles.particles() {
            let x = area.x + (particle.x * area.width.saturating_sub(1) as f32) as u16;
            let y_base = area.y + (particle.y * area.height.saturating_sub(1) as f32) as u16;
            let y = y_base.saturating_add_signed(particle.bob());
            if x < area.right() && y < area.bottom() {
                buf.set_string(
                    x,
                    y,
                    particle.glyph().to_string(),
                    Style::default().fg(theme::PARTICLE_GREEN),
                );
            }
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(7),
                Constraint::Min(3),
            ])
            .split(area.inner(ratatui::layout::Margin {
                horizontal: 4,
                vertical: 1,
            }));

        let banner = Paragraph::new(vec![
            Line::from(Span::styled(
                "AyurVeda Clinic",
                Style::default()
                    .fg(theme::HERBAL_GREEN)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Ancient healing, modern care",
                Style::default().fg(theme::SANDALWOOD),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(banner, chunks[0]);

        // Carousel
        let slide = SLIDES
            .get(self.carousel.current())
            .unwrap_or(&SLIDES[0]);
        let carousel = Paragraph::new(vec![
            Line::from(Span::styled(
                slide.title,
                Style::default()
                    .fg(theme::SAFFRON)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                slide.caption,
                Style::default().fg(theme::LEAF_LIGHT),
            )),
            Line::from(""),
            Line::from(Span::styled(
                self.carousel.indicators(),
                Style::default().fg(theme::SAFFRON),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::LEAF_DARK)),
        );
        frame.render_widget(carousel, chunks[1]);

        let buttons = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "[1] Patient Portal    [2] Doctor Portal    [3] Admin Panel",
                Style::default().fg(theme::HERBAL_GREEN),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Left/Right browse highlights - F4 chat - q quit",
                Style::default().fg(theme::DIM_GRAY),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(buttons, chunks[2]);
    }

    /// Auth screen: portal header, form fields, error line, toggle hint
    fn render_auth(&self, frame: &mut Frame<'_>, area: Rect) {
        let Some(auth) = &self.display.auth else {
            return;
        };

        let accent = match auth.role {
            Role::Patient => theme::PATIENT_TEAL,
            Role::Doctor => theme::DOCTOR_BLUE,
            Role::Admin => theme::ADMIN_MAROON,
        };

        let box_width = area.width.clamp(30, 60);
        let form_area = centered_rect(area, box_width, area.height.min(20));

        let mut lines = vec![
            Line::from(Span::styled(
                auth.role.portal_title(),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                auth.role.portal_subtitle(),
                Style::default().fg(theme::DIM_GRAY),
            )),
            Line::from(""),
        ];

        for (i, field) in self.auth_form.fields().iter().enumerate() {
            let marker = if i == self.auth_form.focused() {
                "> "
            } else {
                "  "
            };
            let style = if i == self.auth_form.focused() {
                Style::default().fg(accent)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(
                format!("{marker}{}: {}", field.label, field.rendered()),
                style,
            )));
        }

        lines.push(Line::from(""));
        if let Some(error) = &self.display.auth_error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(theme::ERROR_RED),
            )));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            format!("[Enter] {}", auth.mode.submit_label()),
            Style::default().fg(theme::HERBAL_GREEN),
        )));
        if auth.toggle_visible {
            lines.push(Line::from(Span::styled(
                format!("[Ctrl+T] {}", auth.mode.toggle_label()),
                Style::default().fg(theme::DIM_GRAY),
            )));
        }
        lines.push(Line::from(Span::styled(
            "[Esc] Back",
            Style::default().fg(theme::DIM_GRAY),
        )));

        let form = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(accent)),
            );
        frame.render_widget(Clear, form_area);
        frame.render_widget(form, form_area);
    }

    /// Dashboard: identity header, tab bar, tab content
    fn render_dashboard(&self, frame: &mut Frame<'_>, area: Rect) {
        let Some(role) = self.display.view.dashboard_role() else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(3),
            ])
            .split(area);

        // Header with identity
        let header = if let Some(identity) = &self.display.identity {
            Line::from(vec![
                Span::styled(
                    format!(" ({}) ", identity.initial),
                    Style::default()
                        .fg(theme::SAFFRON)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    identity.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", identity.detail),
                    Style::default().fg(theme::DIM_GRAY),
                ),
            ])
        } else {
            Line::from(self.display.view.title())
        };
        frame.render_widget(Paragraph::new(header), chunks[0]);

        // Tab bar
        let mut spans = Vec::new();
        for tab in DashboardTab::available_for(role) {
            let style = if Some(*tab) == self.display.active_tab {
                Style::default()
                    .fg(theme::LEAF_DARK)
                    .bg(theme::LEAF_LIGHT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme::DIM_GRAY)
            };
            spans.push(Span::styled(format!(" {} ", tab.label()), style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), chunks[1]);

        // Tab content
        match (role, self.display.active_tab) {
            (Role::Patient, Some(DashboardTab::Book)) => {
                self.render_booking_form(frame, chunks[2]);
            }
            (_, Some(DashboardTab::Appointments)) => {
                self.render_appointments(frame, chunks[2], role == Role::Doctor);
            }
            (Role::Admin, Some(DashboardTab::Doctors)) => {
                let lines: Vec<Line> = DOCTOR_ROSTER
                    .iter()
                    .map(|d| Line::from(format!("  {d}")))
                    .collect();
                frame.render_widget(
                    Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
                    chunks[2],
                );
            }
            (_, Some(DashboardTab::Patients)) => {
                let mut names: Vec<String> = self
                    .display
                    .appointments
                    .iter()
                    .map(|a| a.patient.clone())
                    .collect();
                names.sort();
                names.dedup();
                let lines: Vec<Line> = names.into_iter().map(|n| Line::from(format!("  {n}"))).collect();
                frame.render_widget(
                    Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
                    chunks[2],
                );
            }
            (_, Some(DashboardTab::Profile)) => {
                let lines = if let Some(identity) = &self.display.identity {
                    vec![
                        Line::from(format!("  Name:   {}", identity.name)),
                        Line::from(format!("  Detail: {}", identity.detail)),
                    ]
                } else {
                    vec![Line::from("  No session")]
                };
                frame.render_widget(
                    Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
                    chunks[2],
                );
            }
            _ => {
                // Overview
                let pending = self.display.pending_appointments().len();
                let total = self.display.appointments.len();
                let lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "  Welcome to your wellness space.",
                        Style::default().fg(theme::HERBAL_GREEN),
                    )),
                    Line::from(""),
                    Line::from(format!("  Appointments on record: {total}")),
                    Line::from(format!("  Awaiting confirmation:  {pending}")),
                ];
                frame.render_widget(
                    Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
                    chunks[2],
                );
            }
        }
    }

    /// The patient booking form
    fn render_booking_form(&self, frame: &mut Frame<'_>, area: Rect) {
        let mut lines = vec![Line::from("")];
        for (i, field) in self.booking_form.fields().iter().enumerate() {
            let marker = if i == self.booking_form.focused() {
                "> "
            } else {
                "  "
            };
            let style = if i == self.booking_form.focused() {
                Style::default().fg(theme::PATIENT_TEAL)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(
                format!("{marker}{}: {}", field.label, field.rendered()),
                style,
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  [Enter] Book appointment",
            Style::default().fg(theme::HERBAL_GREEN),
        )));

        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Book Appointment"),
            ),
            area,
        );
    }

    /// The appointment list; doctors get selection and confirm/cancel keys
    fn render_appointments(&self, frame: &mut Frame<'_>, area: Rect, selectable: bool) {
        let pending = self.display.pending_appointments();
        let mut lines = Vec::new();

        for appointment in &self.display.appointments {
            let status_style = match appointment.status {
                clinic_core::AppointmentStatus::Pending => {
                    Style::default().fg(theme::WARNING_AMBER)
                }
                clinic_core::AppointmentStatus::Confirmed => {
                    Style::default().fg(theme::SUCCESS_GREEN)
                }
                clinic_core::AppointmentStatus::Cancelled => Style::default().fg(theme::ERROR_RED),
            };

            let selected = selectable
                && pending
                    .get(self.selected_appointment)
                    .is_some_and(|p| p.id == appointment.id);
            let marker = if selected { "> " } else { "  " };

            lines.push(Line::from(vec![
                Span::raw(format!(
                    "{marker}{} - {} ({}) ",
                    appointment.patient,
                    appointment.when(),
                    appointment.appointment_type,
                )),
                Span::styled(appointment.status.label(), status_style),
            ]));
            lines.push(Line::from(Span::styled(
                format!("    {}", appointment.symptoms),
                Style::default().fg(theme::DIM_GRAY),
            )));
        }

        if selectable {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Up/Down select - c confirm - x cancel",
                Style::default().fg(theme::DIM_GRAY),
            )));
        }

        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Appointments"),
            ),
            area,
        );
    }

    /// The chat widget panel
    fn render_chat(&self, frame: &mut Frame<'_>, area: Rect) {
        let width = CHAT_WIDTH.min(area.width);
        let chat_area = Rect::new(area.right().saturating_sub(width), area.y, width, area.height);

        let inner_width = width.saturating_sub(2) as usize;
        let mut lines = Vec::new();

        for entry in &self.display.transcript {
            let (prefix, style) = match entry.speaker {
                ChatSpeaker::Visitor => ("You: ", Style::default().fg(theme::VISITOR_GREEN)),
                ChatSpeaker::Assistant => {
                    ("AyurBot: ", Style::default().fg(theme::ASSISTANT_GOLD))
                }
            };
            let text = format!("{prefix}{}", entry.text);
            for wrapped in textwrap::wrap(&text, inner_width.max(10)) {
                lines.push(Line::from(Span::styled(wrapped.to_string(), style)));
            }
        }

        if self.display.composing {
            lines.push(Line::from(Span::styled(
                "AyurBot is typing...",
                Style::default()
                    .fg(theme::DIM_GRAY)
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        lines.push(Line::from(""));
        let input_budget = inner_width.saturating_sub(4);
        lines.push(Line::from(Span::styled(
            format!("> {}_", tail_by_width(&self.chat_input, input_budget)),
            Style::default().fg(theme::VISITOR_GREEN),
        )));

        if self.display.quick_questions && !self.display.composing {
            lines.push(Line::from(""));
            for (i, question) in QUICK_QUESTIONS.iter().enumerate() {
                lines.push(Line::from(Span::styled(
                    format!("F{} {question}", i + 1),
                    Style::default().fg(theme::DIM_GRAY),
                )));
            }
        }

        // Keep the tail visible in a small panel
        let visible = area.height.saturating_sub(2) as usize;
        if lines.len() > visible {
            lines.drain(..lines.len() - visible);
        }

        let chat = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("AyurBot")
                .border_style(Style::default().fg(theme::HERBAL_GREEN)),
        );
        frame.render_widget(Clear, chat_area);
        frame.render_widget(chat, chat_area);
    }

    /// The centered passcode prompt
    fn render_otp_prompt(&self, frame: &mut Frame<'_>, area: Rect) {
        let prompt_area = centered_rect(area, 44.min(area.width), 8.min(area.height));

        let mut lines = vec![
            Line::from(Span::styled(
                "Two-Factor Verification",
                Style::default()
                    .fg(theme::DOCTOR_BLUE)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from("A 6-digit code was sent to your device."),
            Line::from(""),
            Line::from(format!("Code: {}_", self.otp_input)),
        ];
        if let Some(error) = &self.display.otp_error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(theme::ERROR_RED),
            )));
        }
        lines.push(Line::from(Span::styled(
            "[Enter] Verify   [Esc] Cancel",
            Style::default().fg(theme::DIM_GRAY),
        )));

        let prompt = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::DOCTOR_BLUE)),
        );
        frame.render_widget(Clear, prompt_area);
        frame.render_widget(prompt, prompt_area);
    }

    /// Status bar: state, toasts, key hints
    fn render_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let (text, style) = if let Some(toast) = self.display.toasts.last() {
            let color = match toast.level {
                NotifyLevel::Info => theme::DIM_GRAY,
                NotifyLevel::Warning => theme::WARNING_AMBER,
                NotifyLevel::Error => theme::ERROR_RED,
                NotifyLevel::Success => theme::SUCCESS_GREEN,
            };
            (format!(" {}", toast.message), Style::default().fg(color))
        } else {
            let hint = match self.display.view {
                View::Landing => "1/2/3 choose portal - F4 chat - q quit",
                View::Auth => "Tab next field - Enter submit - Esc back",
                _ => "Left/Right tabs - F4 chat - Esc logout",
            };
            (
                format!(" {} | {hint}", self.display.clinic_state.description()),
                Style::default().fg(theme::DIM_GRAY),
            )
        };

        frame.render_widget(Paragraph::new(text).style(style), area);
    }
}

/// The widest tail of `s` that fits in `max_width` display columns
fn tail_by_width(s: &str, max_width: usize) -> &str {
    let mut start = s.len();
    for (idx, _) in s.char_indices().rev() {
        if s[idx..].width() > max_width {
            break;
        }
        start = idx;
    }
    &s[start..]
}

/// A centered sub-rectangle of the given size
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
