//! Calculator form state
//!
//! Holds the raw field contents, moves focus between fields, and turns the
//! fields into a validated `ValuationInput`.

use chrono::NaiveDate;

use crate::error::{ResidualError, ResidualResult};
use crate::models::{CycleLength, Currency, ValuationInput};
use crate::services::share_link::ShareParams;
use crate::services::valuation::{days_between, parse_date};
use crate::services::RateQuote;

use super::widgets::input::TextInput;

/// Which form field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Currency,
    Amount,
    Rate,
    Cycle,
    Expiry,
    Transaction,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Currency,
        FormField::Amount,
        FormField::Rate,
        FormField::Cycle,
        FormField::Expiry,
        FormField::Transaction,
    ];

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Select fields cycle through fixed options instead of taking text
    pub fn is_select(self) -> bool {
        matches!(self, Self::Currency | Self::Cycle)
    }
}

/// Outcome of checking the two date fields against each other and today
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCheck {
    /// Nothing to check yet or both dates fine
    Ok,
    /// Expiry was on or before today and has been cleared
    ExpiryCleared,
    /// Transaction was on or after expiry and has been cleared
    TransactionCleared,
}

/// State of the calculator form
#[derive(Debug, Clone)]
pub struct ValuationForm {
    pub currency: Currency,
    pub amount: TextInput,
    pub rate: TextInput,
    pub cycle: CycleLength,
    pub expiry: TextInput,
    pub transaction: TextInput,
    pub focused: FormField,
    /// Currency whose share-link rate outranks the next fetched quote
    pub pinned_rate: Option<Currency>,
}

impl ValuationForm {
    pub fn new(currency: Currency, today: NaiveDate) -> Self {
        let mut form = Self {
            currency,
            amount: TextInput::new().label("Price").placeholder("e.g. 10"),
            rate: TextInput::new().label("Rate").placeholder("CNY per unit"),
            cycle: CycleLength::default(),
            expiry: TextInput::new().label("Expiry").placeholder("YYYY-MM-DD"),
            transaction: TextInput::new()
                .label("Trade date")
                .content(today.format("%Y-%m-%d").to_string()),
            focused: FormField::default(),
            pinned_rate: None,
        };
        if currency.is_local() {
            form.rate.set_content("1");
        }
        form.sync_focus();
        form
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
        self.sync_focus();
    }

    pub fn focus_prev(&mut self) {
        self.focused = self.focused.prev();
        self.sync_focus();
    }

    fn sync_focus(&mut self) {
        let focused = self.focused;
        self.amount.focused = focused == FormField::Amount;
        self.rate.focused = focused == FormField::Rate;
        self.expiry.focused = focused == FormField::Expiry;
        self.transaction.focused = focused == FormField::Transaction;
    }

    /// The text input with focus, if the focused field takes text
    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focused {
            FormField::Amount => Some(&mut self.amount),
            FormField::Rate => Some(&mut self.rate),
            FormField::Expiry => Some(&mut self.expiry),
            FormField::Transaction => Some(&mut self.transaction),
            FormField::Currency | FormField::Cycle => None,
        }
    }

    /// Step a select field; returns `true` when the currency changed
    ///
    /// Picking another currency drops any rate pinned by a share link.
    pub fn cycle_select(&mut self, forward: bool) -> bool {
        match self.focused {
            FormField::Currency => {
                self.currency = if forward {
                    self.currency.next()
                } else {
                    self.currency.prev()
                };
                self.pinned_rate = None;
                true
            }
            FormField::Cycle => {
                self.cycle = if forward {
                    self.cycle.next()
                } else {
                    self.cycle.prev()
                };
                false
            }
            _ => false,
        }
    }

    /// Fill the rate field from a fetched quote unless a link rate is pinned
    pub fn apply_quote(&mut self, quote: &RateQuote) {
        if quote.currency != self.currency {
            return;
        }
        if self.pinned_rate.take() == Some(quote.currency) {
            return;
        }
        self.rate.set_content(quote.rate_label());
    }

    /// The rate field holds a share-link rate for the selected currency
    pub fn rate_is_pinned(&self) -> bool {
        self.pinned_rate == Some(self.currency)
    }

    /// Copy every field a share link carries into the form
    pub fn apply_link(&mut self, params: &ShareParams) {
        if let Some(currency) = params.currency {
            self.currency = currency;
        }
        if let Some(price) = params.price {
            self.amount.set_content(price.to_string());
        }
        if let Some(cycle) = params.cycle {
            self.cycle = cycle;
        }
        if let Some(expiry) = params.expiry_date {
            self.expiry.set_content(expiry.format("%Y-%m-%d").to_string());
        }
        if let Some(transaction) = params.transaction_date {
            self.transaction
                .set_content(transaction.format("%Y-%m-%d").to_string());
        }
        if let Some(rate) = params.rate {
            self.rate.set_content(rate.to_string());
            self.pinned_rate = Some(self.currency);
        }
    }

    /// Clear date fields that can no longer produce a result
    ///
    /// An expiry on or before `today` is cleared first; otherwise a
    /// transaction date on or after the expiry is cleared.
    pub fn validate_dates(&mut self, today: NaiveDate) -> DateCheck {
        let (Ok(expiry), Ok(transaction)) = (
            parse_date(self.expiry.value()),
            parse_date(self.transaction.value()),
        ) else {
            return DateCheck::Ok;
        };

        if expiry <= today {
            self.expiry.clear();
            return DateCheck::ExpiryCleared;
        }
        if transaction >= expiry {
            self.transaction.clear();
            return DateCheck::TransactionCleared;
        }
        DateCheck::Ok
    }

    /// Remaining days for the dates currently entered
    pub fn preview_remaining_days(&self) -> Option<u32> {
        let expiry = parse_date(self.expiry.value()).ok()?;
        let transaction = parse_date(self.transaction.value()).ok()?;
        Some(days_between(expiry, transaction))
    }

    /// Everything currently entered, valid fields only
    pub fn share_params(&self) -> ShareParams {
        ShareParams {
            currency: Some(self.currency),
            price: parse_positive(self.amount.value()),
            cycle: Some(self.cycle),
            expiry_date: parse_date(self.expiry.value()).ok(),
            transaction_date: parse_date(self.transaction.value()).ok(),
            rate: parse_positive(self.rate.value()),
        }
    }

    /// Build a validated input, naming the first bad field
    pub fn to_input(&self) -> ResidualResult<ValuationInput> {
        let rate = parse_positive(self.rate.value())
            .ok_or_else(|| ResidualError::validation("Enter a valid exchange rate"))?;
        let amount = parse_positive(self.amount.value())
            .ok_or_else(|| ResidualError::validation("Enter a valid renewal price"))?;
        let expiry = parse_date(self.expiry.value())
            .map_err(|_| ResidualError::validation("Enter a valid expiry date"))?;
        let transaction = parse_date(self.transaction.value())
            .map_err(|_| ResidualError::validation("Enter a valid transaction date"))?;

        ValuationInput::new(
            self.currency,
            amount,
            rate,
            self.cycle,
            expiry,
            transaction,
        )
    }
}

fn parse_positive(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}
