//! Token creation.
//!
//! A launch is a fixed sequence of ledger submissions that are not atomic
//! with each other:
//!
//! 1. create the mint account, initialize its metadata pointer and the mint
//!    itself (one transaction, co-signed by the fresh mint keypair),
//! 2. fund the metadata rent and write the metadata (one transaction, with a
//!    single overfunded retry when simulation fails),
//! 3. create the creator's associated token account,
//! 4. mint the whole supply into it.
//!
//! Failures up to and including the metadata write abort the launch with an
//! error. Once the mint and its metadata exist, later failures are reported
//! as [`LaunchOutcome::PartialSuccess`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chain_sol::{
    associated_token, mint_len_with_metadata_pointer, system, token_2022, token_metadata,
    Instruction, Keypair, Message, Pubkey, Signer, Transaction, TOKEN_2022_PROGRAM_ID,
};
use tracing::{error, info, warn};

use crate::error::BatuaError;
use crate::metadata::MetadataPinner;
use crate::rpc::SendOptions;
use crate::session::WalletSession;
use crate::types::{MetadataRecord, TokenDescriptor, TokenForm, UploadResult};
use crate::upload::{upload_image, validate_logo, ImageHost, LogoFile};

/// One on-chain unit of work in a launch, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LaunchStep {
    CreateMintAccount,
    InitMetadataPointer,
    InitMint,
    FundMetadataRent,
    InitMetadata,
    CreateAssociatedAccount,
    MintTo,
}

impl LaunchStep {
    pub const ALL: [LaunchStep; 7] = [
        LaunchStep::CreateMintAccount,
        LaunchStep::InitMetadataPointer,
        LaunchStep::InitMint,
        LaunchStep::FundMetadataRent,
        LaunchStep::InitMetadata,
        LaunchStep::CreateAssociatedAccount,
        LaunchStep::MintTo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchStep::CreateMintAccount => "create mint account",
            LaunchStep::InitMetadataPointer => "init metadata pointer",
            LaunchStep::InitMint => "init mint",
            LaunchStep::FundMetadataRent => "fund metadata rent",
            LaunchStep::InitMetadata => "init metadata",
            LaunchStep::CreateAssociatedAccount => "create associated account",
            LaunchStep::MintTo => "mint to",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for LaunchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const MINT_ACCOUNT_STEPS: &[LaunchStep] = &[
    LaunchStep::CreateMintAccount,
    LaunchStep::InitMetadataPointer,
    LaunchStep::InitMint,
];
const METADATA_STEPS: &[LaunchStep] = &[LaunchStep::FundMetadataRent, LaunchStep::InitMetadata];

/// Lifecycle of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepState {
    #[default]
    Pending,
    Built,
    Simulated,
    Submitted,
    Confirmed,
    Failed,
}

/// Per-step state of one launch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchProgress {
    states: [StepState; 7],
}

impl LaunchProgress {
    pub fn state(&self, step: LaunchStep) -> StepState {
        self.states[step.index()]
    }

    fn mark(&mut self, steps: &[LaunchStep], state: StepState) {
        for step in steps {
            self.states[step.index()] = state;
        }
    }

    /// The last step, in execution order, that reached `Confirmed`.
    pub fn furthest_confirmed(&self) -> Option<LaunchStep> {
        LaunchStep::ALL
            .iter()
            .rev()
            .find(|step| self.state(**step) == StepState::Confirmed)
            .copied()
    }
}

/// `num / den` applied to a rent estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiplier {
    pub num: u64,
    pub den: u64,
}

impl Multiplier {
    pub const fn new(num: u64, den: u64) -> Self {
        Self { num, den }
    }

    pub fn apply(&self, lamports: u64) -> Result<u64, BatuaError> {
        if self.den == 0 {
            return Err(BatuaError::Validation("funding multiplier has a zero denominator".into()));
        }
        u64::try_from(u128::from(lamports) * u128::from(self.num) / u128::from(self.den))
            .map_err(|_| BatuaError::Validation(format!("cannot fund {lamports} lamports with {self:?}")))
    }
}

/// How much to send the mint account for its metadata rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundingPolicy {
    pub initial: Multiplier,
    pub overfunded: Multiplier,
}

impl Default for FundingPolicy {
    fn default() -> Self {
        Self {
            initial: Multiplier::new(3, 2),
            overfunded: Multiplier::new(3, 1),
        }
    }
}

impl FundingPolicy {
    pub fn lamports(&self, attempt: FundingAttempt, rent_estimate: u64) -> Result<u64, BatuaError> {
        match attempt {
            FundingAttempt::Initial => self.initial.apply(rent_estimate),
            FundingAttempt::Overfunded => self.overfunded.apply(rent_estimate),
        }
    }
}

/// The two metadata funding attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundingAttempt {
    Initial,
    Overfunded,
}

/// What to do with a metadata transaction after simulating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundingDecision {
    /// Submit the transaction that was just built.
    Submit,
    /// Discard it and submit a rebuilt one for this attempt, unsimulated.
    Retry(FundingAttempt),
}

impl FundingAttempt {
    /// Only the first attempt is simulated.
    pub fn simulates(self) -> bool {
        self == FundingAttempt::Initial
    }

    /// The overfunded retry also skips the node's preflight simulation.
    pub fn send_options(self) -> SendOptions {
        match self {
            FundingAttempt::Initial => SendOptions::default(),
            FundingAttempt::Overfunded => SendOptions::SKIP_PREFLIGHT,
        }
    }

    pub fn after_simulation(self, passed: bool) -> FundingDecision {
        match (self, passed) {
            (FundingAttempt::Initial, false) => FundingDecision::Retry(FundingAttempt::Overfunded),
            _ => FundingDecision::Submit,
        }
    }
}

/// How a launch that produced a mint ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Completed,
    PartialSuccess { failed_step: LaunchStep, reason: String },
}

impl LaunchOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, LaunchOutcome::Completed)
    }
}

#[derive(Debug, Clone)]
pub struct LaunchReport {
    pub name: String,
    pub symbol: String,
    pub mint: Pubkey,
    pub metadata_uri: String,
    pub token_account: Option<Pubkey>,
    pub signatures: Vec<String>,
    pub progress: LaunchProgress,
    pub outcome: LaunchOutcome,
}

impl LaunchReport {
    /// The notification shown to the user.
    pub fn summary(&self) -> String {
        match &self.outcome {
            LaunchOutcome::Completed => {
                format!("Successfully created {} ({}) token!", self.name, self.symbol)
            }
            LaunchOutcome::PartialSuccess { reason, .. } => {
                format!("{} ({}): {reason}", self.name, self.symbol)
            }
        }
    }
}

#[derive(Default)]
struct FormState {
    form: TokenForm,
    logo: Option<LogoFile>,
    upload: Option<UploadResult>,
    preview_url: Option<String>,
}

impl FormState {
    /// A staged logo that has not been uploaded successfully yet.
    fn pending_logo(&self) -> Option<LogoFile> {
        let uploaded = self.upload.as_ref().is_some_and(|u| u.success);
        self.logo.clone().filter(|_| !uploaded)
    }
}

struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, BatuaError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| BatuaError::Busy)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The token launch page: form state plus the orchestrator.
pub struct Launchpad {
    host: Arc<dyn ImageHost>,
    pinner: Arc<dyn MetadataPinner>,
    policy: FundingPolicy,
    state: Mutex<FormState>,
    busy: AtomicBool,
}

impl Launchpad {
    pub fn new(host: Arc<dyn ImageHost>, pinner: Arc<dyn MetadataPinner>) -> Self {
        Self {
            host,
            pinner,
            policy: FundingPolicy::default(),
            state: Mutex::new(FormState::default()),
            busy: AtomicBool::new(false),
        }
    }

    pub fn with_policy(mut self, policy: FundingPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn form(&self) -> TokenForm {
        self.state().form.clone()
    }

    pub fn edit_form(&self, edit: impl FnOnce(&mut TokenForm)) {
        edit(&mut self.state().form);
    }

    pub fn preview_url(&self) -> Option<String> {
        self.state().preview_url.clone()
    }

    pub fn upload_result(&self) -> Option<UploadResult> {
        self.state().upload.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Stage a logo for upload. Rejected files leave the current one staged.
    pub fn stage_logo(&self, file: LogoFile) -> Result<(), BatuaError> {
        validate_logo(&file)?;
        let mut state = self.state();
        state.preview_url = Some(file.preview_url());
        state.logo = Some(file);
        state.upload = None;
        state.form.logo_url = None;
        Ok(())
    }

    /// Upload the staged logo now.
    pub async fn upload_logo(&self) -> Result<String, BatuaError> {
        let logo = self
            .state()
            .logo
            .clone()
            .ok_or_else(|| BatuaError::Validation("Please select a logo first".into()))?;
        self.host.ensure_configured()?;
        self.upload_staged(&logo).await
    }

    async fn upload_staged(&self, logo: &LogoFile) -> Result<String, BatuaError> {
        let result = upload_image(self.host.as_ref(), logo).await;

        let mut state = self.state();
        state.upload = Some(result.clone());
        match result.secure_url.filter(|_| result.success) {
            Some(url) => {
                state.form.logo_url = Some(url.clone());
                Ok(url)
            }
            None => Err(BatuaError::Upload(
                result.error.unwrap_or_else(|| "unknown upload failure".into()),
            )),
        }
    }

    /// Run a full launch for the current form.
    pub async fn create_token(&self, session: &WalletSession) -> Result<LaunchReport, BatuaError> {
        let _busy = BusyGuard::acquire(&self.busy)?;

        let (descriptor, pending_logo) = {
            let state = self.state();
            (TokenDescriptor::try_from(&state.form)?, state.pending_logo())
        };
        self.pinner.ensure_configured()?;
        if pending_logo.is_some() {
            self.host.ensure_configured()?;
        }

        let logo_url = match pending_logo {
            Some(logo) => Some(self.upload_staged(&logo).await?),
            None => descriptor.logo_url.clone(),
        };

        let mint = Keypair::generate();
        let mint_pubkey = mint.pubkey();
        info!(mint = %mint_pubkey, name = %descriptor.name, "launching token");

        let record = MetadataRecord::new(&mint_pubkey, &descriptor, logo_url.as_deref());
        let metadata_uri = self.pinner.publish(&record).await?;

        let mut run = LaunchRun {
            session,
            policy: self.policy,
            descriptor: &descriptor,
            mint: &mint,
            progress: LaunchProgress::default(),
            signatures: Vec::new(),
        };

        // Nothing is paid for until the metadata write is known to fit.
        let metadata_ix = run.metadata_instruction(&metadata_uri)?;
        run.ensure_metadata_fits(&metadata_ix)?;

        if let Err(e) = run.create_mint_account().await {
            error!(error = %e, "mint account step failed");
            return Err(e);
        }
        if let Err(e) = run.initialize_metadata(&metadata_ix, &metadata_uri).await {
            error!(error = %e, "metadata step failed");
            return Err(e);
        }

        let (token_account, outcome) = run.fund_creator().await;

        if outcome.is_complete() {
            info!(mint = %mint_pubkey, "token launched");
            let mut state = self.state();
            *state = FormState::default();
        }

        Ok(LaunchReport {
            name: descriptor.name.clone(),
            symbol: descriptor.symbol.clone(),
            mint: mint_pubkey,
            metadata_uri,
            token_account,
            signatures: run.signatures,
            progress: run.progress,
            outcome,
        })
    }
}

/// State of one in-flight launch.
struct LaunchRun<'a> {
    session: &'a WalletSession,
    policy: FundingPolicy,
    descriptor: &'a TokenDescriptor,
    mint: &'a Keypair,
    progress: LaunchProgress,
    signatures: Vec<String>,
}

impl LaunchRun<'_> {
    fn payer(&self) -> Pubkey {
        self.session.pubkey()
    }

    async fn build(
        &mut self,
        instructions: &[Instruction],
        steps: &[LaunchStep],
        with_mint_signer: bool,
    ) -> Result<Transaction, BatuaError> {
        let session = self.session;
        let blockhash = session.rpc().get_latest_blockhash().await?;
        let wallet: &dyn Signer = session.wallet();
        let mint: &dyn Signer = self.mint;
        let payer = self.payer();
        let tx = if with_mint_signer {
            Transaction::new_signed(instructions, &payer, &blockhash, &[wallet, mint])?
        } else {
            Transaction::new_signed(instructions, &payer, &blockhash, &[wallet])?
        };
        self.progress.mark(steps, StepState::Built);
        Ok(tx)
    }

    async fn submit_and_confirm(
        &mut self,
        tx: &Transaction,
        steps: &[LaunchStep],
        options: SendOptions,
    ) -> Result<String, BatuaError> {
        let session = self.session;
        let rpc = session.rpc();
        let signature = match rpc.send_transaction(tx, options).await {
            Ok(signature) => signature,
            Err(e) => {
                self.progress.mark(steps, StepState::Failed);
                return Err(e);
            }
        };
        self.progress.mark(steps, StepState::Submitted);
        self.signatures.push(signature.clone());

        if let Err(e) = rpc
            .confirm_transaction(&signature, session.commitment())
            .await
        {
            self.progress.mark(steps, StepState::Failed);
            return Err(e);
        }
        self.progress.mark(steps, StepState::Confirmed);
        info!(step = %steps[0], %signature, "confirmed");
        Ok(signature)
    }

    async fn create_mint_account(&mut self) -> Result<(), BatuaError> {
        let payer = self.payer();
        let mint = self.mint.pubkey();
        let session = self.session;
        let rpc = session.rpc();

        let space = mint_len_with_metadata_pointer();
        let lamports = rpc.get_minimum_balance_for_rent_exemption(space).await?;
        let instructions = [
            system::create_account(&payer, &mint, lamports, space as u64, &TOKEN_2022_PROGRAM_ID),
            token_2022::initialize_metadata_pointer(&mint, Some(&payer), Some(&mint)),
            token_2022::initialize_mint(&mint, self.descriptor.decimals, &payer)?,
        ];
        let tx = self.build(&instructions, MINT_ACCOUNT_STEPS, true).await?;

        let simulation = rpc.simulate_transaction(&tx).await?;
        if let Some(reason) = simulation.err {
            self.progress.mark(MINT_ACCOUNT_STEPS, StepState::Failed);
            return Err(BatuaError::Simulation {
                step: LaunchStep::CreateMintAccount,
                reason,
            });
        }
        self.progress.mark(MINT_ACCOUNT_STEPS, StepState::Simulated);

        self.submit_and_confirm(&tx, MINT_ACCOUNT_STEPS, SendOptions::default())
            .await
            .map_err(|e| match e {
                BatuaError::Confirmation(reason) => {
                    BatuaError::Confirmation(format!("mint account creation failed: {reason}"))
                }
                other => other,
            })?;
        Ok(())
    }

    async fn metadata_transaction(
        &mut self,
        attempt: FundingAttempt,
        rent_estimate: u64,
        metadata_ix: &Instruction,
    ) -> Result<Transaction, BatuaError> {
        let lamports = self.policy.lamports(attempt, rent_estimate)?;
        info!(?attempt, lamports, "funding metadata rent");
        let instructions = [
            system::transfer(&self.payer(), &self.mint.pubkey(), lamports)?,
            metadata_ix.clone(),
        ];
        self.build(&instructions, METADATA_STEPS, false).await
    }

    fn metadata_instruction(&self, uri: &str) -> Result<Instruction, BatuaError> {
        let payer = self.payer();
        Ok(token_metadata::initialize(
            &self.mint.pubkey(),
            &payer,
            &payer,
            &self.descriptor.name,
            &self.descriptor.onchain_symbol(),
            uri,
        )?)
    }

    /// Fails with `Validation` when the metadata transaction would exceed
    /// the packet size. The transfer amount is fixed-width, so any value
    /// gives the real size.
    fn ensure_metadata_fits(&self, metadata_ix: &Instruction) -> Result<(), BatuaError> {
        let payer = self.payer();
        let instructions = [
            system::transfer(&payer, &self.mint.pubkey(), 1)?,
            metadata_ix.clone(),
        ];
        let message = Message::compile(&instructions, &payer, &[0u8; 32])?;
        Transaction::new_unsigned(message)
            .to_wire_bytes()
            .map(|_| ())
            .map_err(|e| {
                warn!(error = %e, "metadata transaction too large");
                BatuaError::Validation(
                    "Token name and metadata URI are too long to store on-chain".into(),
                )
            })
    }

    async fn initialize_metadata(
        &mut self,
        metadata_ix: &Instruction,
        uri: &str,
    ) -> Result<(), BatuaError> {
        let symbol = self.descriptor.onchain_symbol();
        let metadata_len = token_metadata::estimate_metadata_len(&self.descriptor.name, &symbol, uri);
        let rent_estimate = self
            .session
            .rpc()
            .get_minimum_balance_for_rent_exemption(metadata_len)
            .await?;

        let mut attempt = FundingAttempt::Initial;
        let mut tx = self
            .metadata_transaction(attempt, rent_estimate, metadata_ix)
            .await?;

        if attempt.simulates() {
            let passed = match self.session.rpc().simulate_transaction(&tx).await {
                Ok(outcome) => match outcome.err {
                    None => true,
                    Some(reason) => {
                        warn!(%reason, "metadata simulation failed");
                        false
                    }
                },
                Err(e) => {
                    warn!(error = %e, "metadata simulation unavailable");
                    false
                }
            };
            if passed {
                self.progress.mark(METADATA_STEPS, StepState::Simulated);
            }
            if let FundingDecision::Retry(next) = attempt.after_simulation(passed) {
                attempt = next;
                tx = self
                    .metadata_transaction(attempt, rent_estimate, metadata_ix)
                    .await?;
            }
        }

        self.submit_and_confirm(&tx, METADATA_STEPS, attempt.send_options())
            .await?;
        Ok(())
    }

    /// Steps after the metadata write. Never fails the launch.
    async fn fund_creator(&mut self) -> (Option<Pubkey>, LaunchOutcome) {
        let token_account = match self.create_token_account().await {
            Ok(account) => account,
            Err(e) => {
                let outcome = self.partial(
                    LaunchStep::CreateAssociatedAccount,
                    "token created but no token account",
                    e,
                );
                return (None, outcome);
            }
        };

        match self.mint_supply(&token_account).await {
            Ok(()) => (Some(token_account), LaunchOutcome::Completed),
            Err(e) => (
                Some(token_account),
                self.partial(LaunchStep::MintTo, "minting failed", e),
            ),
        }
    }

    fn partial(&mut self, step: LaunchStep, reason: &str, cause: BatuaError) -> LaunchOutcome {
        self.progress.mark(&[step], StepState::Failed);
        warn!(%step, error = %cause, "{reason}");
        LaunchOutcome::PartialSuccess {
            failed_step: step,
            reason: format!("{reason}: {cause}"),
        }
    }

    async fn create_token_account(&mut self) -> Result<Pubkey, BatuaError> {
        let payer = self.payer();
        let (ix, token_account) = associated_token::create_associated_token_account_idempotent(
            &payer,
            &payer,
            &self.mint.pubkey(),
            &TOKEN_2022_PROGRAM_ID,
        )?;
        let steps = &[LaunchStep::CreateAssociatedAccount];
        let tx = self.build(&[ix], steps, false).await?;
        self.submit_and_confirm(&tx, steps, SendOptions::default())
            .await?;
        Ok(token_account)
    }

    async fn mint_supply(&mut self, token_account: &Pubkey) -> Result<(), BatuaError> {
        let amount = self.descriptor.base_units()?;
        let ix = token_2022::mint_to(&self.mint.pubkey(), token_account, &self.payer(), amount)?;
        let steps = &[LaunchStep::MintTo];
        let tx = self.build(&[ix], steps, false).await?;
        self.submit_and_confirm(&tx, steps, SendOptions::default())
            .await?;
        info!(amount, "supply minted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_display_in_words() {
        assert_eq!(LaunchStep::CreateMintAccount.to_string(), "create mint account");
        assert_eq!(LaunchStep::MintTo.to_string(), "mint to");
        assert!(LaunchStep::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn funding_multipliers() {
        let policy = FundingPolicy::default();
        assert_eq!(policy.lamports(FundingAttempt::Initial, 1_000).unwrap(), 1_500);
        assert_eq!(policy.lamports(FundingAttempt::Overfunded, 1_000).unwrap(), 3_000);
        assert_eq!(policy.lamports(FundingAttempt::Initial, 3).unwrap(), 4);
        assert!(Multiplier::new(1, 0).apply(5).is_err());
        assert!(Multiplier::new(3, 1).apply(u64::MAX).is_err());
    }

    #[test]
    fn only_a_failed_first_attempt_retries() {
        assert!(FundingAttempt::Initial.simulates());
        assert!(!FundingAttempt::Overfunded.simulates());

        assert_eq!(
            FundingAttempt::Initial.after_simulation(true),
            FundingDecision::Submit
        );
        assert_eq!(
            FundingAttempt::Initial.after_simulation(false),
            FundingDecision::Retry(FundingAttempt::Overfunded)
        );
        assert_eq!(
            FundingAttempt::Overfunded.after_simulation(false),
            FundingDecision::Submit
        );

        assert!(!FundingAttempt::Initial.send_options().skip_preflight);
        assert!(FundingAttempt::Overfunded.send_options().skip_preflight);
    }

    #[test]
    fn furthest_confirmed_step() {
        let mut progress = LaunchProgress::default();
        assert_eq!(progress.furthest_confirmed(), None);

        progress.mark(MINT_ACCOUNT_STEPS, StepState::Confirmed);
        assert_eq!(progress.furthest_confirmed(), Some(LaunchStep::InitMint));

        progress.mark(METADATA_STEPS, StepState::Confirmed);
        progress.mark(&[LaunchStep::CreateAssociatedAccount], StepState::Failed);
        assert_eq!(progress.furthest_confirmed(), Some(LaunchStep::InitMetadata));
        assert_eq!(progress.state(LaunchStep::MintTo), StepState::Pending);
    }

    #[test]
    fn busy_guard_is_exclusive_and_released() {
        let flag = AtomicBool::new(false);
        {
            let _guard = BusyGuard::acquire(&flag).unwrap();
            assert!(matches!(BusyGuard::acquire(&flag), Err(BatuaError::Busy)));
        }
        assert!(BusyGuard::acquire(&flag).is_ok());
    }

    #[test]
    fn summary_messages() {
        let mut report = LaunchReport {
            name: "My Token".into(),
            symbol: "MTK".into(),
            mint: Pubkey::default(),
            metadata_uri: String::new(),
            token_account: None,
            signatures: vec![],
            progress: LaunchProgress::default(),
            outcome: LaunchOutcome::Completed,
        };
        assert_eq!(report.summary(), "Successfully created My Token (MTK) token!");

        report.outcome = LaunchOutcome::PartialSuccess {
            failed_step: LaunchStep::MintTo,
            reason: "minting failed".into(),
        };
        assert_eq!(report.summary(), "My Token (MTK): minting failed");
    }
}
