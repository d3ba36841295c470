//! `loan_simulation` is a Rust library for simulating fixed-installment loans.
//!
//! It implements the French amortization system (also called the Price table):
//! every period pays the same total amount, with the interest/principal split
//! shifting over time as the outstanding balance decreases. From a loan amount,
//! an annual interest rate and a term in months it produces the fixed monthly
//! payment, the total paid and total interest, and the full month-by-month
//! amortization schedule.
//!
//! ## Usage
//!
//! Add `loan_simulation` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! loan_simulation = "0.1.0"
//! rust_decimal = "1.39.0"
//! rust_decimal_macros = "1.39.0"
//! ```
//!
//! Then build a [`SimulationInput`] and call [`simulate`] (or
//! [`compute_schedule`] for the unrounded figures):
//!
//! ```rust
//! use loan_simulation::{simulate, SimulationInput};
//! use rust_decimal_macros::dec;
//!
//! fn main() {
//!     let input = SimulationInput {
//!         amount: dec!(10_000),
//!         annual_rate: dec!(12),
//!         term_months: 12,
//!     };
//!
//!     match simulate(&input) {
//!         Ok(response) => {
//!             println!("Monthly payment: {:.2}", response.summary.monthly_payment);
//!             println!("Total payment:   {:.2}", response.summary.total_payment);
//!             println!("Total interest:  {:.2}", response.summary.total_interest);
//!             println!("Periods:         {}", response.amortization_table.len());
//!         }
//!         Err(e) => {
//!             eprintln!("Simulation rejected: {}", e);
//!         }
//!     }
//! }
//! ```

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest accepted term, in months.
pub const MIN_TERM_MONTHS: u32 = 1;
/// Longest accepted term, in months (30 years).
pub const MAX_TERM_MONTHS: u32 = 360;

/// A specialized Result type for simulation operations.
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Errors signaled by the simulation entry points.
///
/// Invalid inputs are rejected at entry and never reach the payment formula;
/// either a complete schedule is produced or one of these errors is returned
/// and no rows are emitted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// The loan amount was zero or negative.
    #[error("loan amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    /// The annual rate was outside the accepted (0, 100] percent range.
    #[error("annual rate must be greater than 0 and at most 100 percent, got {0}")]
    RateOutOfRange(Decimal),

    /// The term was outside the accepted 1..=360 month range.
    #[error("term must be between 1 and 360 months, got {0}")]
    TermOutOfRange(u32),

    /// A zero or negative monthly rate reached the payment formula, which is
    /// undefined there (the annuity denominator collapses to zero).
    #[error("monthly rate {0} makes the fixed-payment formula undefined")]
    DegenerateRate(Decimal),

    /// An intermediate value exceeded the numeric range of `Decimal`.
    #[error("schedule computation exceeded the numeric range")]
    NumericOverflow,
}

/// Input parameters for a loan simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    /// The principal amount of the loan.
    pub amount: Decimal,
    /// The annual interest rate as a percentage (e.g., 12.5 for 12.5%).
    pub annual_rate: Decimal,
    /// The term of the loan in months.
    pub term_months: u32,
}

impl SimulationInput {
    /// Checks the preconditions of the amortization engine: positive amount,
    /// annual rate in (0, 100], term between [`MIN_TERM_MONTHS`] and
    /// [`MAX_TERM_MONTHS`]. Callers such as a form or request layer can run
    /// this on its own; [`compute_schedule`] always runs it first.
    pub fn validate(&self) -> SimulationResult<()> {
        if self.amount <= Decimal::ZERO {
            return Err(SimulationError::NonPositiveAmount(self.amount));
        }
        if self.annual_rate <= Decimal::ZERO || self.annual_rate > dec!(100) {
            return Err(SimulationError::RateOutOfRange(self.annual_rate));
        }
        if self.term_months < MIN_TERM_MONTHS || self.term_months > MAX_TERM_MONTHS {
            return Err(SimulationError::TermOutOfRange(self.term_months));
        }
        Ok(())
    }
}

/// Represents one period of the amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRow {
    /// The period number, starting at 1.
    pub period: u32,
    /// The balance owed at the start of the period.
    pub opening_balance: Decimal,
    /// The fixed payment for the period, identical across all rows.
    pub payment: Decimal,
    /// The portion of the payment that covers interest.
    pub interest: Decimal,
    /// The portion of the payment that reduces the principal.
    pub principal: Decimal,
    /// The balance owed after the payment, clamped to never go below zero.
    pub closing_balance: Decimal,
}

/// Aggregate figures for a simulation, recomputable from the schedule rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// The fixed monthly payment.
    pub monthly_payment: Decimal,
    /// The total paid over the life of the loan (`monthly_payment * term`).
    pub total_payment: Decimal,
    /// The total interest paid (`total_payment - amount`).
    pub total_interest: Decimal,
}

/// The full result of the amortization engine: summary figures plus one
/// [`PaymentRow`] per period, ordered by period ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// The aggregate figures for the simulation.
    pub summary: SimulationSummary,
    /// One row per period, `term_months` rows in total.
    pub rows: Vec<PaymentRow>,
}

/// One row of the amortization table in the shape the simulation client
/// exchanges with its backend. `balance` is the closing balance of the month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    /// The month number, starting at 1.
    pub month: u32,
    /// The fixed monthly payment.
    pub payment: Decimal,
    /// The portion of the payment that reduces the principal.
    pub principal: Decimal,
    /// The portion of the payment that covers interest.
    pub interest: Decimal,
    /// The balance remaining after the month's payment.
    pub balance: Decimal,
}

/// A complete simulation document: the echoed inputs, the summary, and the
/// amortization table, with monetary figures rounded to 2 decimal places.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResponse {
    /// The requested loan amount (echo of the input).
    pub amount: Decimal,
    /// The annual rate as a percentage (echo of the input).
    pub annual_rate: Decimal,
    /// The term in months (echo of the input).
    pub term_months: u32,
    /// The aggregate figures for the simulation.
    pub summary: SimulationSummary,
    /// The full amortization table, one entry per month.
    pub amortization_table: Vec<TableRow>,
}

/// Converts a nominal annual percentage rate to the monthly rate used by the
/// schedule: `annual_rate / 100 / 12`.
///
/// This is the nominal conversion, not the compounded effective rate; 12% per
/// year becomes exactly 1% per month.
pub fn monthly_rate_from_annual_percent(annual_rate: Decimal) -> Decimal {
    annual_rate / dec!(100) / dec!(12)
}

/// Computes the fixed payment and the full amortization schedule for a loan
/// repaid under the French (fixed-installment) system.
///
/// Validates the input, derives the monthly rate, solves the annuity formula
/// for the fixed payment, and walks the balance through every period:
/// `interest = balance * rate`, `principal = payment - interest`,
/// `closing = balance - principal`. The closing balance is clamped at zero
/// and the clamped value is carried into the next period, so consecutive
/// rows always chain exactly and rounding drift cannot accumulate a
/// negative balance.
///
/// # Errors
///
/// Returns [`SimulationError::NonPositiveAmount`],
/// [`SimulationError::RateOutOfRange`] or [`SimulationError::TermOutOfRange`]
/// when a precondition fails, and [`SimulationError::NumericOverflow`] if an
/// intermediate value leaves the `Decimal` range. No rows are produced on
/// any error.
pub fn compute_schedule(input: &SimulationInput) -> SimulationResult<AmortizationSchedule> {
    input.validate()?;

    let monthly_rate = monthly_rate_from_annual_percent(input.annual_rate);
    let payment = fixed_payment(input.amount, monthly_rate, input.term_months)?;

    let mut balance = input.amount;
    let mut rows = Vec::with_capacity(input.term_months as usize);

    for period in 1..=input.term_months {
        let interest = balance
            .checked_mul(monthly_rate)
            .ok_or(SimulationError::NumericOverflow)?;
        let principal = payment - interest;
        let closing_balance = (balance - principal).max(Decimal::ZERO);
        rows.push(PaymentRow {
            period,
            opening_balance: balance,
            payment,
            interest,
            principal,
            closing_balance,
        });
        balance = closing_balance;
    }

    let total_payment = payment
        .checked_mul(Decimal::from(input.term_months))
        .ok_or(SimulationError::NumericOverflow)?;
    let total_interest = total_payment - input.amount;

    Ok(AmortizationSchedule {
        summary: SimulationSummary {
            monthly_payment: payment,
            total_payment,
            total_interest,
        },
        rows,
    })
}

/// Runs [`compute_schedule`] and shapes the result as the document the
/// simulation client exchanges with its backend: inputs echoed back, monetary
/// figures rounded to 2 decimal places, and the table keyed by `month` with
/// the closing `balance` of each period.
///
/// # Errors
///
/// Same failure conditions as [`compute_schedule`].
pub fn simulate(input: &SimulationInput) -> SimulationResult<SimulationResponse> {
    let schedule = compute_schedule(input)?;

    Ok(SimulationResponse {
        amount: input.amount,
        annual_rate: input.annual_rate,
        term_months: input.term_months,
        summary: SimulationSummary {
            monthly_payment: schedule.summary.monthly_payment.round_dp(2),
            total_payment: schedule.summary.total_payment.round_dp(2),
            total_interest: schedule.summary.total_interest.round_dp(2),
        },
        amortization_table: schedule
            .rows
            .iter()
            .map(|row| TableRow {
                month: row.period,
                payment: row.payment.round_dp(2),
                principal: row.principal.round_dp(2),
                interest: row.interest.round_dp(2),
                balance: row.closing_balance.round_dp(2),
            })
            .collect(),
    })
}

/// Solves the annuity formula for the fixed payment:
/// PMT = P * [i(1 + i)^n] / [(1 + i)^n – 1]
///
/// Validation keeps a non-positive rate from reaching this point, but the
/// denominator is still guarded: a degenerate rate must never turn into a
/// division by zero or a nonsensical payment.
fn fixed_payment(
    amount: Decimal,
    monthly_rate: Decimal,
    term_months: u32,
) -> SimulationResult<Decimal> {
    if monthly_rate <= Decimal::ZERO {
        return Err(SimulationError::DegenerateRate(monthly_rate));
    }

    let growth = (dec!(1) + monthly_rate)
        .checked_powu(term_months.into())
        .ok_or(SimulationError::NumericOverflow)?;
    let denominator = growth - dec!(1);
    if denominator <= Decimal::ZERO {
        return Err(SimulationError::DegenerateRate(monthly_rate));
    }

    amount
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_mul(growth))
        .and_then(|v| v.checked_div(denominator))
        .ok_or(SimulationError::NumericOverflow)
}
