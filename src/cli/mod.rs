use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use crate::application::{GoodwillService, TracingNotifier};
use crate::config::{Config, DEFAULT_DATABASE};
use crate::domain::{
    BloodGroup, BloodRequestForm, DonorForm, DonorListing, Gender, format_rupees,
};

/// GoodWill - blood donation rewards and pharmacy cart
#[derive(Parser)]
#[command(name = "goodwill")]
#[command(about = "Earn points by donating blood, spend them on medical supplies")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "GOODWILL_DB", default_value = DEFAULT_DATABASE)]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Simulated donor search time in milliseconds
    #[arg(long, global = true, default_value = "2000")]
    pub search_delay_ms: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Show the current points balance
    Points,

    /// List pharmacy products
    Catalog,

    /// List rewards that can be redeemed with points
    Rewards,

    /// Cart management commands
    #[command(subcommand)]
    Cart(CartCommands),

    /// Buy everything in the cart and earn its points
    Checkout,

    /// Redeem a reward with points
    Redeem {
        /// Reward ID (see `rewards`)
        reward_id: i64,
    },

    /// Donor registry commands
    #[command(subcommand)]
    Donor(DonorCommands),

    /// List patients who need a given blood group
    Needs {
        /// Blood group (A+, A-, B+, B-, AB+, AB-, O+, O-)
        #[arg(short, long)]
        blood_group: String,
    },

    /// Donate to a patient in need
    Donate {
        /// Patient ID (see `needs`)
        patient_id: i64,
    },

    /// List nearby hospitals that collect blood
    Hospitals,

    /// Blood request commands
    #[command(subcommand)]
    Request(RequestCommands),

    /// Record a visit and show community statistics
    Stats,

    /// Show points activity, newest first
    History {
        /// Maximum number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Export data to CSV or JSON
    Export {
        /// What to export: history, donors, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format for history: csv, json (default: csv)
        #[arg(short, long)]
        format: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CartCommands {
    /// Add one unit of a product
    Add {
        /// Product ID (see `catalog`)
        product_id: i64,
    },

    /// Remove a product line
    Remove {
        /// Product ID
        product_id: i64,
    },

    /// Set the quantity of a line (0 or less removes it)
    Set {
        /// Product ID
        product_id: i64,

        /// New quantity
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },

    /// Show the cart and its totals
    Show,

    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
pub enum DonorCommands {
    /// Register as a blood donor
    Register {
        /// Full name
        name: String,

        /// Age in years
        #[arg(long)]
        age: u32,

        /// Gender: male, female, other
        #[arg(long, default_value = "male")]
        gender: String,

        /// Phone number
        #[arg(long)]
        phone: String,

        /// Blood group (A+, A-, B+, B-, AB+, AB-, O+, O-)
        #[arg(short, long)]
        blood_group: String,

        /// First available date (YYYY-MM-DD)
        #[arg(long)]
        available: Option<String>,

        /// Address or coordinates
        #[arg(long, default_value = "")]
        address: String,

        /// Donated within the last two months
        #[arg(long)]
        recently_donated: bool,
    },

    /// List donors, optionally matching a blood group
    List {
        /// Blood group to match exactly
        #[arg(short, long)]
        blood_group: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum RequestCommands {
    /// Ask for blood and find matching donors
    Submit {
        /// Patient name
        patient_name: String,

        /// Patient age
        #[arg(long)]
        age: u32,

        /// Gender: male, female, other
        #[arg(long, default_value = "male")]
        gender: String,

        /// Contact phone number
        #[arg(long)]
        phone: String,

        /// Blood group (A+, A-, B+, B-, AB+, AB-, O+, O-)
        #[arg(short, long)]
        blood_group: String,

        /// Units required
        #[arg(short, long, default_value = "1")]
        units: u32,

        /// Hospital name
        #[arg(long)]
        hospital: String,

        /// Address
        #[arg(long, default_value = "")]
        address: String,
    },

    /// List submitted requests
    List,
}

impl Cli {
    /// Default log filter when RUST_LOG is not set.
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "goodwill=debug" } else { "goodwill=info" }
    }

    fn config(&self) -> Config {
        Config::default()
            .with_database(self.database.clone())
            .with_search_delay(Duration::from_millis(self.search_delay_ms))
    }

    pub async fn run(self) -> Result<()> {
        let config = self.config();

        // Init is the only command that may create the database file
        if matches!(self.command, Commands::Init) {
            GoodwillService::init(config, Arc::new(TracingNotifier)).await?;
            println!("Database initialized: {}", self.database);
            return Ok(());
        }

        let mut service = GoodwillService::connect(config, Arc::new(TracingNotifier))
            .await
            .with_context(|| {
                format!(
                    "Failed to open {}. Run `goodwill init` first",
                    self.database
                )
            })?;

        match self.command {
            Commands::Init => {}

            Commands::Points => {
                println!("Balance: {} points", service.balance());
            }

            Commands::Catalog => run_catalog_command(&service),

            Commands::Rewards => run_rewards_command(&service),

            Commands::Cart(cart_cmd) => run_cart_command(&mut service, cart_cmd).await?,

            Commands::Checkout => {
                let receipt = service.checkout().await?;
                println!(
                    "Paid {} for {} items",
                    format_rupees(receipt.totals.total_price),
                    receipt.totals.total_items
                );
                println!(
                    "Earned {} points, balance is now {}",
                    receipt.totals.total_points, receipt.balance
                );
            }

            Commands::Redeem { reward_id } => {
                let receipt = service.redeem(reward_id).await?;
                println!(
                    "Redeemed {} for {} points, balance is now {}",
                    receipt.reward.name, receipt.reward.cost_points, receipt.balance
                );
            }

            Commands::Donor(donor_cmd) => run_donor_command(&service, donor_cmd).await?,

            Commands::Needs { blood_group } => {
                let group = parse_blood_group(&blood_group)?;
                let patients = service.people_in_need(group);
                if patients.is_empty() {
                    println!("Nobody currently needs {} blood.", group);
                } else {
                    println!(
                        "{:<4} {:<16} {:<6} {:<10} {:<10} {}",
                        "ID", "NAME", "GROUP", "QUANTITY", "DISTANCE", "ADDRESS"
                    );
                    println!("{}", "-".repeat(80));
                    for p in patients {
                        println!(
                            "{:<4} {:<16} {:<6} {:<10} {:<10} {}",
                            p.id, p.name, p.blood_group, p.quantity, p.distance, p.address
                        );
                    }
                }
            }

            Commands::Donate { patient_id } => {
                let receipt = service.donate(patient_id).await?;
                println!(
                    "Thank you for donating to {}! +{} points, balance is now {}",
                    receipt.patient.name, receipt.points_earned, receipt.balance
                );
            }

            Commands::Hospitals => run_hospitals_command(&service),

            Commands::Request(request_cmd) => run_request_command(&service, request_cmd).await?,

            Commands::Stats => {
                let stats = service.record_visit(Utc::now()).await?;
                println!("Donations:  {}", stats.donations_count);
                println!("Users:      {}", stats.users_count);
                println!("Recipients: {}", stats.recipients_count);
            }

            Commands::History { limit } => {
                let history = service.history().await?;
                println!("Current balance: {} points", service.balance());
                if history.is_empty() {
                    println!("No activity yet.");
                } else {
                    println!();
                    println!("{:<12} {:<12} {:>8}  {}", "DATE", "ACTION", "POINTS", "DETAILS");
                    println!("{}", "-".repeat(70));
                    // History is already newest first
                    for entry in history.iter().take(limit.unwrap_or(usize::MAX)) {
                        println!(
                            "{:<12} {:<12} {:>8}  {}",
                            entry.recorded_at.format("%Y-%m-%d"),
                            entry.kind,
                            format!("{:+}", entry.points),
                            entry.details
                        );
                    }
                }
            }

            Commands::Export {
                export_type,
                output,
                format,
            } => {
                run_export_command(&service, &export_type, output.as_deref(), format.as_deref())
                    .await?;
            }
        }

        Ok(())
    }
}

fn run_catalog_command(service: &GoodwillService) {
    println!(
        "{:<4} {:<24} {:<12} {:>10} {:>8}",
        "ID", "NAME", "CATEGORY", "PRICE", "POINTS"
    );
    println!("{}", "-".repeat(62));
    for product in service.products() {
        println!(
            "{:<4} {:<24} {:<12} {:>10} {:>8}",
            product.id,
            product.name,
            product.category,
            format_rupees(product.price),
            product.points
        );
    }
}

fn run_hospitals_command(service: &GoodwillService) {
    println!(
        "{:<4} {:<24} {:<10} {:<18} {}",
        "ID", "NAME", "DISTANCE", "HOURS", "ADDRESS"
    );
    println!("{}", "-".repeat(90));
    for hospital in service.hospitals() {
        println!(
            "{:<4} {:<24} {:<10} {:<18} {}",
            hospital.id, hospital.name, hospital.distance, hospital.hours, hospital.address
        );
    }
}

fn run_rewards_command(service: &GoodwillService) {
    let balance = service.balance();
    println!("Your balance: {} points", balance);
    println!();
    println!("{:<4} {:<24} {:<12} {:>8}  {}", "ID", "NAME", "CATEGORY", "COST", "");
    println!("{}", "-".repeat(62));
    for reward in service.rewards() {
        // Flag rewards the balance cannot cover yet
        let status = if balance < reward.cost_points {
            "insufficient points"
        } else {
            ""
        };
        println!(
            "{:<4} {:<24} {:<12} {:>8}  {}",
            reward.id, reward.name, reward.category, reward.cost_points, status
        );
    }
}

async fn run_cart_command(service: &mut GoodwillService, cmd: CartCommands) -> Result<()> {
    match cmd {
        CartCommands::Add { product_id } => {
            let line = service.add_to_cart(product_id).await?;
            println!("Added {} (quantity {})", line.name, line.quantity);
        }

        CartCommands::Remove { product_id } => {
            service.remove_from_cart(product_id).await?;
            println!("Removed product {}", product_id);
        }

        CartCommands::Set {
            product_id,
            quantity,
        } => {
            service.update_cart_quantity(product_id, quantity).await?;
            // The line is gone when the quantity dropped to zero or below
            match service.cart().lines().iter().find(|l| l.id == product_id) {
                Some(line) => println!("{}: quantity {}", line.name, line.quantity),
                None => println!("Product {} is not in the cart", product_id),
            }
        }

        CartCommands::Show => {
            let cart = service.cart();
            if cart.is_empty() {
                println!("Your cart is empty");
                return Ok(());
            }

            println!(
                "{:<4} {:<24} {:>10} {:>6} {:>5}",
                "ID", "NAME", "PRICE", "POINTS", "QTY"
            );
            println!("{}", "-".repeat(53));
            for line in cart.lines() {
                println!(
                    "{:<4} {:<24} {:>10} {:>6} {:>5}",
                    line.id,
                    line.name,
                    format_rupees(line.unit_price),
                    line.unit_points,
                    line.quantity
                );
            }
            let totals = cart.totals();
            println!();
            println!(
                "Subtotal ({} items): {}",
                totals.total_items,
                format_rupees(totals.total_price)
            );
            println!("Points to earn: {}", totals.total_points);
        }

        CartCommands::Clear => {
            service.clear_cart().await?;
            println!("Cart cleared");
        }
    }
    Ok(())
}

async fn run_donor_command(service: &GoodwillService, cmd: DonorCommands) -> Result<()> {
    match cmd {
        DonorCommands::Register {
            name,
            age,
            gender,
            phone,
            blood_group,
            available,
            address,
            recently_donated,
        } => {
            // Availability is optional here; registration rejects it when missing
            let availability = available
                .map(|date| parse_date(&date))
                .transpose()
                .context("Invalid availability date")?;

            let form = DonorForm {
                name,
                age,
                gender: parse_gender(&gender)?,
                phone,
                blood_group: parse_blood_group(&blood_group)?,
                availability,
                address,
                recently_donated,
            };

            let donor = service.register_donor(form).await?;
            println!(
                "Registered donor: {} ({}) available from {}",
                donor.name, donor.blood_group, donor.availability
            );
        }

        DonorCommands::List { blood_group } => {
            let listings = match blood_group {
                Some(group) => service.find_donors(parse_blood_group(&group)?).await?,
                None => service
                    .list_donors()
                    .await?
                    .iter()
                    .map(DonorListing::from)
                    .collect(),
            };

            if listings.is_empty() {
                println!("No donors registered.");
                return Ok(());
            }

            println!(
                "{:<20} {:<6} {:<4} {:<8} {:<12} {:<12} {}",
                "NAME", "GROUP", "AGE", "GENDER", "PHONE", "AVAILABLE", "ADDRESS"
            );
            println!("{}", "-".repeat(80));
            for donor in listings {
                println!(
                    "{:<20} {:<6} {:<4} {:<8} {:<12} {:<12} {}",
                    donor.name,
                    donor.blood_group,
                    donor.age,
                    donor.gender,
                    donor.phone,
                    donor.availability,
                    donor.address
                );
            }
        }
    }
    Ok(())
}

async fn run_request_command(service: &GoodwillService, cmd: RequestCommands) -> Result<()> {
    match cmd {
        RequestCommands::Submit {
            patient_name,
            age,
            gender,
            phone,
            blood_group,
            units,
            hospital,
            address,
        } => {
            let form = BloodRequestForm {
                patient_name,
                age,
                gender: parse_gender(&gender)?,
                phone,
                blood_group: parse_blood_group(&blood_group)?,
                units,
                hospital,
                address,
            };

            let submission = service.submit_request(form).await?;
            println!("Searching for {} donors...", submission.request.blood_group);
            // Block until the simulated search completes
            submission.confirmation.wait().await;

            println!(
                "Found {} potential donors matching {}",
                submission.donors.len(),
                submission.request.blood_group
            );
            for donor in &submission.donors {
                println!("  {:<20} {:<12} {}", donor.name, donor.phone, donor.address);
            }
        }

        RequestCommands::List => {
            let requests = service.list_requests().await?;
            if requests.is_empty() {
                println!("No requests submitted.");
                return Ok(());
            }
            println!(
                "{:<20} {:<6} {:>5} {:<24} {}",
                "PATIENT", "GROUP", "UNITS", "HOSPITAL", "SUBMITTED"
            );
            println!("{}", "-".repeat(80));
            for r in requests {
                println!(
                    "{:<20} {:<6} {:>5} {:<24} {}",
                    r.patient_name,
                    r.blood_group,
                    r.units,
                    r.hospital,
                    r.submitted_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }
    Ok(())
}

async fn run_export_command(
    service: &GoodwillService,
    export_type: &str,
    output: Option<&str>,
    format: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    // Route by export type and format
    match (export_type, format.unwrap_or("csv")) {
        ("history", "csv") => {
            let count = exporter.export_history_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} history entries", count);
            }
        }
        ("history", "json") => {
            let count = exporter.export_history_json(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} history entries", count);
            }
        }
        ("donors", _) => {
            let count = exporter.export_donors_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} donors", count);
            }
        }
        ("full", _) => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported profile: {} points, {} cart lines, {} donors, {} requests, {} history entries",
                    snapshot.points,
                    snapshot.cart.len(),
                    snapshot.donors.len(),
                    snapshot.requests.len(),
                    snapshot.history.len()
                );
            }
        }
        ("history", other) => {
            anyhow::bail!("Invalid format '{}'. Valid formats: csv, json", other);
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: history, donors, full",
                export_type
            );
        }
    }

    Ok(())
}

fn parse_blood_group(input: &str) -> Result<BloodGroup> {
    Ok(input.parse::<BloodGroup>()?)
}

fn parse_gender(input: &str) -> Result<Gender> {
    Gender::from_str(input).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid gender '{}'. Valid values: male, female, other",
            input
        )
    })
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    // Parse YYYY-MM-DD format
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").context("Date must be in YYYY-MM-DD format")
}
