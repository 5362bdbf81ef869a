use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::{
    ActivityEntry, ActivityKind, BloodGroup, BloodRequestForm, BloodRequestRecord, CartLine,
    CartTotals, DonorForm, DonorListing, DonorRecord, Hospital, Patient, Product, ProductId,
    RewardItem, UsageStats, find_product, find_reward, hospitals, match_donors, match_patients,
    patients_in_need, pharmacy_products, reward_items, sample_donors,
};
use crate::storage::{DynKeyValueStore, LoadOutcome, SqliteStore, keys, load_json, save_json};

use super::{AppError, CartAggregator, DynNotifier, Notification, PendingTask, PointsLedger};

/// Application service that owns the store, the points ledger and the cart
/// for one profile, and exposes every user-facing flow on top of them.
pub struct GoodwillService {
    store: DynKeyValueStore,
    notifier: DynNotifier,
    config: Config,
    ledger: PointsLedger,
    cart: CartAggregator,
    startup: StartupReport,
}

/// How the ledger and cart were obtained when the service opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupReport {
    pub points: LoadOutcome,
    pub cart: LoadOutcome,
}

/// Result of a completed checkout
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub totals: CartTotals,
    pub balance: i64,
}

/// Result of a redemption
#[derive(Debug, Clone)]
pub struct RedemptionReceipt {
    pub reward: RewardItem,
    pub balance: i64,
}

/// Result of donating to a patient in need
#[derive(Debug, Clone)]
pub struct DonationReceipt {
    pub patient: Patient,
    pub points_earned: i64,
    pub balance: i64,
}

/// A stored blood request plus the donors it matched. The confirmation
/// notification fires after the configured search delay unless cancelled.
#[derive(Debug)]
pub struct RequestSubmission {
    pub request: BloodRequestRecord,
    pub donors: Vec<DonorListing>,
    pub confirmation: PendingTask,
}

impl GoodwillService {
    /// Build the service on top of an existing store, restoring the ledger
    /// and the cart.
    pub async fn open(
        store: DynKeyValueStore,
        notifier: DynNotifier,
        config: Config,
    ) -> Result<Self, AppError> {
        let (ledger, points) = PointsLedger::load(store.clone(), notifier.clone()).await?;
        let (cart, cart_outcome) = CartAggregator::load(store.clone(), notifier.clone()).await?;

        for (what, outcome) in [("points", &points), ("cart", &cart_outcome)] {
            match outcome {
                LoadOutcome::Restored => info!(what, "state restored"),
                LoadOutcome::Defaulted(reason) => warn!(what, ?reason, "state defaulted"),
            }
        }

        Ok(Self {
            store,
            notifier,
            config,
            ledger,
            cart,
            startup: StartupReport {
                points,
                cart: cart_outcome,
            },
        })
    }

    /// Initialize a new database at the configured path.
    pub async fn init(config: Config, notifier: DynNotifier) -> Result<Self, AppError> {
        let store = SqliteStore::init(&config.create_url()).await?;
        Self::open(Arc::new(store), notifier, config).await
    }

    /// Connect to an existing database at the configured path.
    pub async fn connect(config: Config, notifier: DynNotifier) -> Result<Self, AppError> {
        let store = SqliteStore::connect(&config.connect_url()).await?;
        Self::open(Arc::new(store), notifier, config).await
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn startup_report(&self) -> &StartupReport {
        &self.startup
    }

    pub fn ledger(&self) -> &PointsLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut PointsLedger {
        &mut self.ledger
    }

    pub fn cart(&self) -> &CartAggregator {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartAggregator {
        &mut self.cart
    }

    pub fn balance(&self) -> i64 {
        self.ledger.balance()
    }

    // ========================
    // Pharmacy and cart
    // ========================

    pub fn products(&self) -> Vec<Product> {
        pharmacy_products()
    }

    /// Add one unit of a catalog product to the cart.
    pub async fn add_to_cart(&mut self, product_id: ProductId) -> Result<CartLine, AppError> {
        let product = find_product(product_id).ok_or(AppError::ProductNotFound(product_id))?;
        Ok(self.cart.add_item(&product).await?)
    }

    pub async fn remove_from_cart(&mut self, product_id: ProductId) -> Result<(), AppError> {
        Ok(self.cart.remove_item(product_id).await?)
    }

    pub async fn update_cart_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), AppError> {
        Ok(self.cart.update_quantity(product_id, quantity).await?)
    }

    pub async fn clear_cart(&mut self) -> Result<(), AppError> {
        Ok(self.cart.clear().await?)
    }

    /// Complete a purchase: grant the cart's points, then empty the cart.
    ///
    /// The two writes are not atomic. If clearing fails after the grant,
    /// the points stay granted and the cart keeps its lines.
    pub async fn checkout(&mut self) -> Result<CheckoutReceipt, AppError> {
        if self.cart.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let totals = self.cart.totals();
        let balance = self.ledger.add_points(totals.total_points).await?;
        self.cart.clear().await?;

        self.append_activity(ActivityEntry::new(
            ActivityKind::Purchase,
            totals.total_points,
            format!("Pharmacy purchase - {} items", totals.total_items),
        ))
        .await?;

        info!(
            items = totals.total_items,
            price = totals.total_price,
            points = totals.total_points,
            "checkout completed"
        );
        self.notifier.notify(Notification::info(
            "Payment Successful!",
            format!(
                "You've earned {} points for your purchase!",
                totals.total_points
            ),
        ));

        Ok(CheckoutReceipt { totals, balance })
    }

    // ========================
    // Rewards
    // ========================

    pub fn rewards(&self) -> Vec<RewardItem> {
        reward_items()
    }

    /// Spend points on a reward. Refused when the balance does not cover it.
    pub async fn redeem(&mut self, reward_id: i64) -> Result<RedemptionReceipt, AppError> {
        let reward = find_reward(reward_id).ok_or(AppError::RewardNotFound(reward_id))?;
        let current = self.ledger.point_balance();

        if !current.covers(reward.cost_points) {
            let shortfall = current.shortfall(reward.cost_points);
            self.notifier.notify(Notification::destructive(
                "Insufficient Points",
                format!(
                    "You need {} more points to redeem this item.",
                    shortfall
                ),
            ));
            return Err(AppError::InsufficientPoints {
                balance: current.value(),
                required: reward.cost_points,
                shortfall,
            });
        }

        let balance = self.ledger.add_points(-reward.cost_points).await?;
        self.append_activity(ActivityEntry::new(
            ActivityKind::Redemption,
            -reward.cost_points,
            format!("Redeemed {}", reward.name),
        ))
        .await?;

        self.notifier.notify(Notification::info(
            "Redemption Successful!",
            format!("You have successfully redeemed {}.", reward.name),
        ));

        Ok(RedemptionReceipt { reward, balance })
    }

    // ========================
    // Donations
    // ========================

    /// Patients waiting for exactly `blood_group`.
    pub fn people_in_need(&self, blood_group: BloodGroup) -> Vec<Patient> {
        match_patients(&patients_in_need(), blood_group)
    }

    /// Donate to a patient in need and earn the donation reward.
    pub async fn donate(&mut self, patient_id: i64) -> Result<DonationReceipt, AppError> {
        let patient = patients_in_need()
            .into_iter()
            .find(|p| p.id == patient_id)
            .ok_or(AppError::PatientNotFound(patient_id))?;

        let reward = self.config.donation_reward;
        let balance = self.ledger.add_points(reward).await?;
        self.update_stats(UsageStats::record_donation).await?;
        self.append_activity(ActivityEntry::new(
            ActivityKind::Donation,
            reward,
            format!("Blood donation for {} at {}", patient.name, patient.address),
        ))
        .await?;

        self.notifier.notify(Notification::info(
            "Congratulations!",
            format!("You've earned {} points for your donation.", reward),
        ));

        Ok(DonationReceipt {
            patient,
            points_earned: reward,
            balance,
        })
    }

    /// Nearby blood collection points.
    pub fn hospitals(&self) -> Vec<Hospital> {
        hospitals()
    }

    /// Register a blood donor.
    pub async fn register_donor(&self, form: DonorForm) -> Result<DonorRecord, AppError> {
        let donor = match DonorRecord::register(form) {
            Ok(donor) => donor,
            Err(err) => {
                self.notifier
                    .notify(Notification::destructive(err.title(), err.to_string()));
                return Err(err.into());
            }
        };

        let mut donors = self.list_donors().await?;
        donors.push(donor.clone());
        save_json(self.store.as_ref(), keys::DONORS, &donors).await?;

        info!(donor_id = %donor.id, blood_group = %donor.blood_group, "donor registered");
        self.notifier.notify(Notification::info(
            "Thank you for registering!",
            "Your information has been saved. You may be contacted when someone needs your blood type.",
        ));
        Ok(donor)
    }

    pub async fn list_donors(&self) -> Result<Vec<DonorRecord>, AppError> {
        let loaded = load_json::<Vec<DonorRecord>>(self.store.as_ref(), keys::DONORS).await?;
        Ok(loaded.value)
    }

    /// Donors with exactly `blood_group`; sample donors when nobody registered matches.
    pub async fn find_donors(&self, blood_group: BloodGroup) -> Result<Vec<DonorListing>, AppError> {
        let donors = self.list_donors().await?;
        let matches = match_donors(&donors, blood_group);
        if matches.is_empty() {
            return Ok(sample_donors(blood_group));
        }
        Ok(matches)
    }

    // ========================
    // Blood requests
    // ========================

    /// Store a blood request and look up matching donors. The confirmation
    /// toast is deferred by the configured search delay.
    pub async fn submit_request(
        &self,
        form: BloodRequestForm,
    ) -> Result<RequestSubmission, AppError> {
        let request = BloodRequestRecord::submit(form);

        let mut requests = self.list_requests().await?;
        requests.push(request.clone());
        save_json(self.store.as_ref(), keys::REQUESTS, &requests).await?;
        self.update_stats(UsageStats::record_request).await?;

        let donors = self.find_donors(request.blood_group).await?;
        info!(request_id = %request.id, matches = donors.len(), "blood request submitted");

        let notifier = self.notifier.clone();
        let confirmation = PendingTask::schedule(self.config.search_delay, move || {
            notifier.notify(Notification::info(
                "Request submitted",
                "We're connecting you with compatible donors in your area.",
            ));
        });

        Ok(RequestSubmission {
            request,
            donors,
            confirmation,
        })
    }

    pub async fn list_requests(&self) -> Result<Vec<BloodRequestRecord>, AppError> {
        let loaded =
            load_json::<Vec<BloodRequestRecord>>(self.store.as_ref(), keys::REQUESTS).await?;
        Ok(loaded.value)
    }

    // ========================
    // Stats and history
    // ========================

    pub async fn stats(&self) -> Result<UsageStats, AppError> {
        let loaded = load_json::<UsageStats>(self.store.as_ref(), keys::STATS).await?;
        Ok(loaded.value)
    }

    /// Count a landing-page visit at `now`.
    pub async fn record_visit(&self, now: DateTime<Utc>) -> Result<UsageStats, AppError> {
        let window = self.config.session_window;
        self.update_stats(|stats| {
            stats.register_visit(now, window);
        })
        .await
    }

    /// Activity entries, newest first.
    pub async fn history(&self) -> Result<Vec<ActivityEntry>, AppError> {
        let loaded = load_json::<Vec<ActivityEntry>>(self.store.as_ref(), keys::ACTIVITY).await?;
        let mut entries = loaded.value;
        entries.reverse();
        Ok(entries)
    }

    async fn update_stats<F>(&self, update: F) -> Result<UsageStats, AppError>
    where
        F: FnOnce(&mut UsageStats),
    {
        let mut stats = self.stats().await?;
        update(&mut stats);
        save_json(self.store.as_ref(), keys::STATS, &stats).await?;
        Ok(stats)
    }

    async fn append_activity(&self, entry: ActivityEntry) -> Result<(), AppError> {
        let loaded = load_json::<Vec<ActivityEntry>>(self.store.as_ref(), keys::ACTIVITY).await?;
        let mut entries = loaded.value;
        entries.push(entry);
        save_json(self.store.as_ref(), keys::ACTIVITY, &entries).await?;
        Ok(())
    }
}
