//! Application state for the TUI
//!
//! The App struct holds all state needed for rendering and handling events.
//! Time is passed in explicitly so the state machine can be driven from tests.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::config::settings::system_prefers_dark;
use crate::config::{ResidualPaths, Settings, Theme};
use crate::error::ResidualResult;
use crate::models::{Valuation, ValuationInput};
use crate::notify::{NotificationQueue, QueueConfig, Severity, TransitionProperty};
use crate::services::share_link::{self, DecodedLink};
use crate::services::{FetchTicket, RateOutcome, RateQuote, RateTracker, ValuationEngine};

use super::form::{DateCheck, FormField, ValuationForm};

/// Quiet period after a currency change before the rate is fetched
pub const RATE_FETCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// How long the high-value banner stays up
pub const CELEBRATION_DURATION: Duration = Duration::from_secs(3);

/// Main application state
pub struct App {
    /// Application settings
    pub settings: Settings,

    /// Paths configuration
    pub paths: ResidualPaths,

    /// Whether the app should quit
    pub should_quit: bool,

    pub form: ValuationForm,

    pub notifications: NotificationQueue,

    pub rates: RateTracker,

    pub engine: ValuationEngine,

    pub theme: Theme,

    /// Inputs and outcome of the last successful calculation
    pub last_valuation: Option<(ValuationInput, Valuation)>,

    /// The high-value banner is shown until this instant
    pub celebrate_until: Option<Instant>,

    pub share_link: Option<String>,

    /// Status bar message
    pub status_message: Option<String>,

    /// Debounced fetch waiting for its quiet period
    rate_fetch_due: Option<Instant>,

    /// Fetch started but not yet handed to the runtime
    outgoing_fetch: Option<FetchTicket>,

    /// A share link is waiting for its rate before calculating
    calculate_on_rate: bool,
}

impl App {
    /// Create a new App instance
    pub fn new(mut settings: Settings, paths: ResidualPaths, today: NaiveDate) -> Self {
        let (theme, theme_changed) = settings.resolve_theme(system_prefers_dark());
        if theme_changed {
            if let Err(e) = settings.save(&paths) {
                warn!(error = %e, "could not persist resolved theme");
            }
        }

        let notifications = NotificationQueue::with_config(QueueConfig {
            anchor: settings.toast_anchor,
            ..QueueConfig::default().with_default_duration_ms(settings.notification_duration_ms)
        });
        let engine = ValuationEngine::new(settings.high_value_threshold);
        let form = ValuationForm::new(settings.default_currency, today);

        Self {
            settings,
            paths,
            should_quit: false,
            form,
            notifications,
            rates: RateTracker::new(),
            engine,
            theme,
            last_valuation: None,
            celebrate_until: None,
            share_link: None,
            status_message: None,
            rate_fetch_due: None,
            outgoing_fetch: None,
            calculate_on_rate: false,
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn is_celebrating(&self, now: Instant) -> bool {
        self.celebrate_until.is_some_and(|until| now < until)
    }

    /// Prefill the form from a share link and calculate once a rate is known
    ///
    /// A link that carries its own rate, or names the local currency, is
    /// calculated right away; otherwise the first fetch outcome triggers it.
    pub fn load_link(&mut self, link: &str, today: NaiveDate, now: Instant) {
        let DecodedLink { params, rejected } = share_link::decode(link);
        if !rejected.is_empty() {
            warn!(rejected = ?rejected, "share link carried invalid parameters");
            let message = format!("Ignored invalid link parameters: {}", rejected.join(", "));
            self.toast(Severity::Warning, message, now);
        }
        if params.is_empty() {
            return;
        }
        info!("form prefilled from share link");
        self.form.apply_link(&params);

        if self.form.currency.is_local() {
            self.request_rate();
        }
        if self.form.rate_is_pinned() || self.form.currency.is_local() {
            self.calculate(today, now);
        } else {
            self.calculate_on_rate = true;
        }
    }

    /// Start a fetch for the selected currency, or pin the local rate
    pub fn request_rate(&mut self) {
        self.rate_fetch_due = None;
        let currency = self.form.currency;
        if currency.is_local() {
            self.rates.cancel();
            if !self.form.rate_is_pinned() {
                self.form.rate.set_content("1");
            }
            return;
        }
        let ticket = self.rates.begin(currency);
        self.outgoing_fetch = Some(ticket);
        self.set_status(format!("Fetching {} rate...", currency));
    }

    /// The selected currency changed; refetch after the debounce window
    pub fn on_currency_changed(&mut self, now: Instant) {
        self.rates.cancel();
        self.form.pinned_rate = None;
        if self.form.currency.is_local() {
            self.request_rate();
            return;
        }
        self.rate_fetch_due = Some(now + RATE_FETCH_DEBOUNCE);
    }

    pub fn rate_fetch_due(&self) -> Option<Instant> {
        self.rate_fetch_due
    }

    /// Hand the next fetch to whoever runs network I/O
    pub fn take_fetch_request(&mut self) -> Option<FetchTicket> {
        self.outgoing_fetch.take()
    }

    /// A fetch finished; out-of-date results are dropped
    pub fn on_rate_fetched(
        &mut self,
        ticket: FetchTicket,
        result: ResidualResult<RateQuote>,
        today: NaiveDate,
        now: Instant,
    ) {
        match self.rates.complete(ticket, result) {
            RateOutcome::Applied(quote) => {
                info!(currency = %quote.currency, rate = quote.rate, "exchange rate updated");
                self.form.apply_quote(&quote);
                self.clear_status();
            }
            RateOutcome::Failed(err) => {
                error!(currency = %ticket.currency(), error = %err, "exchange rate fetch failed");
                let message = format!("Rate fetch failed: {}", err.user_message());
                self.toast(Severity::Error, message, now);
                self.set_status("Enter the exchange rate manually");
            }
            RateOutcome::Stale => return,
        }

        if std::mem::take(&mut self.calculate_on_rate) {
            self.calculate(today, now);
        }
    }

    /// Check the date fields, raising a toast for any that were cleared
    pub fn check_dates(&mut self, today: NaiveDate, now: Instant) -> bool {
        let message = match self.form.validate_dates(today) {
            DateCheck::Ok => return true,
            DateCheck::ExpiryCleared => "Expiry date must be after today",
            DateCheck::TransactionCleared => "Transaction date must be before the expiry date",
        };
        self.toast(Severity::Error, message, now);
        false
    }

    /// Validate the form and compute the remaining value
    pub fn calculate(&mut self, today: NaiveDate, now: Instant) {
        if !self.check_dates(today, now) {
            return;
        }

        let outcome = self
            .form
            .to_input()
            .and_then(|input| self.engine.evaluate(&input).map(|v| (input, v)));

        match outcome {
            Ok((input, valuation)) => {
                info!(
                    remaining_value = valuation.result.remaining_value,
                    high_value = valuation.high_value,
                    "calculation complete"
                );
                self.toast(Severity::Success, "Calculation complete", now);
                if valuation.high_value {
                    self.celebrate_until = Some(now + CELEBRATION_DURATION);
                }
                self.last_valuation = Some((input, valuation));
            }
            Err(err) => {
                self.toast(Severity::Error, err.user_message(), now);
            }
        }
    }

    /// Encode the current form as a share link
    pub fn build_share_link(&mut self, now: Instant) {
        let params = self.form.share_params();
        match share_link::encode_link(&params, self.settings.share_base_url.as_deref()) {
            Ok(link) => {
                self.share_link = Some(link);
                self.toast(Severity::Success, "Share link ready", now);
            }
            Err(err) => self.toast(Severity::Error, err.user_message(), now),
        }
    }

    /// Switch between light and dark and persist the choice
    pub fn toggle_theme(&mut self, now: Instant) {
        self.theme = self.settings.toggle_theme();
        if let Err(err) = self.settings.save(&self.paths) {
            error!(error = %err, "could not save theme");
            self.toast(Severity::Error, err.user_message(), now);
            return;
        }
        self.set_status(format!("Theme: {}", self.theme));
    }

    /// Move focus, checking dates when leaving a date field
    pub fn move_focus(&mut self, forward: bool, today: NaiveDate, now: Instant) {
        let leaving = self.form.focused;
        if forward {
            self.form.focus_next();
        } else {
            self.form.focus_prev();
        }
        if matches!(leaving, FormField::Expiry | FormField::Transaction) {
            self.check_dates(today, now);
        }
    }

    /// Run after every drawn frame
    pub fn after_frame(&mut self, now: Instant) {
        self.notifications.on_frame(now);
    }

    /// Advance every timer the app owns
    pub fn on_tick(&mut self, now: Instant) {
        self.notifications.tick(now);
        for id in self.notifications.completed_fades(now) {
            self.notifications
                .on_transition_end(id, TransitionProperty::Opacity);
        }

        if self.rate_fetch_due.is_some_and(|due| due <= now) {
            self.request_rate();
        }

        if self.celebrate_until.is_some_and(|until| until <= now) {
            self.celebrate_until = None;
        }
    }

    fn toast(&mut self, severity: Severity, message: impl Into<String>, now: Instant) {
        let duration = self.notifications.config().default_duration;
        self.notifications.enqueue_at(message, severity, duration, now);
    }
}
