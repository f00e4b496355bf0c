use std::fmt;
use std::time::Duration;

use crate::error::Result;
use crate::model::{Amount, TxHash};
use crate::venues::{ExecutionResult, Venue, WithdrawMode};

/// Which of the two venues a phase acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    /// The direct-call lending pool.
    Direct,
    /// The router/multicall lending market.
    Router,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Deposit,
    Withdraw,
}

/// Where the rotation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Depositing(Leg),
    Holding,
    Withdrawing(Leg),
    Completed,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Depositing(leg) => write!(f, "deposit {leg:?}"),
            Phase::Holding => write!(f, "hold"),
            Phase::Withdrawing(leg) => write!(f, "withdraw {leg:?}"),
            Phase::Completed => write!(f, "completed"),
            Phase::Failed => write!(f, "failed"),
        }
    }
}

/// In-memory rotation position. Lost on restart; a new run starts at cycle 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleState {
    pub index: u32,
    pub total: u32,
    pub hold: Duration,
}

/// One executed venue action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub cycle: u32,
    pub phase: Phase,
    pub venue: String,
    /// Amount asked of the venue. `None` when a full-balance venue
    /// withdrew its whole position regardless of the configured amount.
    pub requested: Option<Amount>,
    pub result: ExecutionResult,
}

impl StepRecord {
    pub fn tx_hash(&self) -> Option<TxHash> {
        self.result.tx_hash()
    }
}

/// Everything a finished rotation did, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationReport {
    pub steps: Vec<StepRecord>,
    pub cycles_completed: u32,
}

/// Drives the direct and router venues through timed deposit/withdraw cycles.
///
/// One action runs at a time. The first error moves the rotation to
/// `Failed` and is returned unchanged; there is no retry or resume.
pub struct RotationScheduler {
    direct: Box<dyn Venue>,
    router: Box<dyn Venue>,
    amount: Amount,
    state: CycleState,
    phase: Phase,
    unwind_on_complete: bool,
    report: RotationReport,
}

impl RotationScheduler {
    pub fn new(
        direct: Box<dyn Venue>,
        router: Box<dyn Venue>,
        amount: Amount,
        cycles: u32,
        hold: Duration,
    ) -> Self {
        RotationScheduler {
            direct,
            router,
            amount,
            state: CycleState {
                index: 0,
                total: cycles,
                hold,
            },
            phase: Phase::Idle,
            unwind_on_complete: false,
            report: RotationReport::default(),
        }
    }

    /// Redeem the router position after the last cycle.
    pub fn with_unwind_on_complete(mut self, unwind: bool) -> Self {
        self.unwind_on_complete = unwind;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Run every cycle to completion, or stop at the first failure.
    pub async fn run(&mut self) -> Result<RotationReport> {
        match self.run_cycles().await {
            Ok(()) => {
                self.phase = Phase::Completed;
                tracing::info!(cycles = self.report.cycles_completed, "rotation completed");
                Ok(std::mem::take(&mut self.report))
            }
            Err(e) => {
                tracing::error!(
                    cycle = self.state.index,
                    phase = %self.phase,
                    error = %e,
                    "rotation failed"
                );
                self.phase = Phase::Failed;
                Err(e)
            }
        }
    }

    async fn run_cycles(&mut self) -> Result<()> {
        for index in 0..self.state.total {
            self.state.index = index;
            println!(
                "[{}] ── Cycle {}/{} ──",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S"),
                index + 1,
                self.state.total
            );

            // No prior router position exists before the first cycle.
            if index > 0 {
                self.step(Action::Withdraw, Leg::Router).await?;
            }
            self.step(Action::Deposit, Leg::Direct).await?;
            self.hold().await;
            self.step(Action::Withdraw, Leg::Direct).await?;
            self.step(Action::Deposit, Leg::Router).await?;

            self.report.cycles_completed = index + 1;
            let more_follows = index + 1 < self.state.total || self.unwind_on_complete;
            if more_follows {
                self.hold().await;
            }
        }

        if self.unwind_on_complete && self.state.total > 0 {
            println!("── Final unwind ──");
            self.step(Action::Withdraw, Leg::Router).await?;
        }
        Ok(())
    }

    async fn step(&mut self, action: Action, leg: Leg) -> Result<()> {
        let venue = match leg {
            Leg::Direct => &self.direct,
            Leg::Router => &self.router,
        };
        let (phase, requested, result) = match action {
            Action::Deposit => {
                self.phase = Phase::Depositing(leg);
                let result = venue.deposit(&self.amount).await?;
                (self.phase, Some(self.amount.clone()), result)
            }
            Action::Withdraw => {
                self.phase = Phase::Withdrawing(leg);
                let requested = match venue.withdraw_mode() {
                    WithdrawMode::Partial => Some(self.amount.clone()),
                    WithdrawMode::FullBalance => None,
                };
                let result = venue.withdraw(&self.amount).await?;
                (self.phase, requested, result)
            }
        };
        let name = venue.name().to_string();

        let tx = match result.tx_hash() {
            Some(hash) => hash.to_string(),
            None => "none".to_string(),
        };
        let size = match &requested {
            Some(amount) => amount.to_string(),
            None => "full position".to_string(),
        };
        println!(
            "[{}] cycle {}/{} {} {} on {}: tx {}",
            chrono::Utc::now().format("%H:%M:%S"),
            self.state.index + 1,
            self.state.total,
            phase,
            size,
            name,
            tx
        );

        self.report.steps.push(StepRecord {
            cycle: self.state.index,
            phase,
            venue: name,
            requested,
            result,
        });
        Ok(())
    }

    async fn hold(&mut self) {
        self.phase = Phase::Holding;
        if self.state.hold.is_zero() {
            return;
        }
        println!("  Holding for {}s...", self.state.hold.as_secs());
        tokio::time::sleep(self.state.hold).await;
    }
}
