use crate::infra::MemoryStore;
use crate::routes::{build_services, Services};
use clap::Args;
use std::sync::Arc;

use agrilink::config::AdminConfig;
use agrilink::error::AppError;
use agrilink::marketplace::identity::{Actor, NewUser, User, UserRole};
use agrilink::marketplace::lifecycle::{ApplicationRequest, BookingRequest, DecisionOutcome};
use agrilink::marketplace::listings::{
    EquipmentStatus, ListingCategory, NewEquipment, NewLabourJob,
};
use agrilink::marketplace::profiles::ProfileDraft;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the admin audit portion of the demo.
    #[arg(long)]
    pub(crate) skip_admin: bool,
}

const DEMO_PASSWORD: &str = "monsoon-2024";

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(MemoryStore::default());
    store.seed_market_prices();
    let admin = AdminConfig {
        username: "admin".to_string(),
        password: "admin123".to_string(),
    };
    let services = build_services(store, &admin)?;

    println!("AgriLink marketplace demo");

    let seller = register(&services, "Sunil Patil", "sunil@agrilink.example", UserRole::Seller)?;
    let farmer = register(&services, "Asha Pawar", "asha@agrilink.example", UserRole::Farmer)?;
    let labourer = register(
        &services,
        "Ravi Jadhav",
        "ravi@agrilink.example",
        UserRole::Labourer,
    )?;

    println!("\nLogin with the wrong role tab:");
    match services
        .identity
        .login("asha@agrilink.example", DEMO_PASSWORD, UserRole::Seller)
    {
        Err(err) => println!("  rejected: {err}"),
        Ok(_) => println!("  unexpectedly succeeded"),
    }

    let (_, token) = services
        .identity
        .login("asha@agrilink.example", DEMO_PASSWORD, UserRole::Farmer)
        .map_err(demo_failure)?;
    println!("Farmer session token: {}...", &token.0[..8]);

    let seller_actor = actor(&seller);
    let farmer_actor = actor(&farmer);
    let labourer_actor = actor(&labourer);

    println!("\nEquipment rental flow");
    let tractor = services
        .listings
        .create_equipment(
            seller_actor,
            NewEquipment {
                name: "Heavy-duty tractor".to_string(),
                category: ListingCategory::Equipment,
                description: "55 HP, suited for plowing and tilling".to_string(),
                price: 1200.0,
                unit: "hr".to_string(),
                image_url: String::new(),
                availability: "Weekdays".to_string(),
            },
        )
        .map_err(demo_failure)?;
    println!("  {} listed as {}", tractor.name, tractor.status.label());

    let paused = services
        .listings
        .set_equipment_status(seller_actor, tractor.id, EquipmentStatus::Paused)
        .map_err(demo_failure)?;
    println!(
        "  paused -> discoverable listings: {}",
        services.listings.available_equipment().map_err(demo_failure)?.len()
    );
    services
        .listings
        .set_equipment_status(seller_actor, paused.id, EquipmentStatus::Available)
        .map_err(demo_failure)?;

    let booking = services
        .lifecycle
        .request_booking(
            farmer_actor,
            BookingRequest {
                equipment_id: tractor.id,
                slot: "21 Nov 6AM-2PM".to_string(),
                price: 8800.0,
            },
        )
        .map_err(demo_failure)?;
    println!(
        "  booking #{} requested ({})",
        booking.id,
        booking.status.label()
    );

    let queue = services
        .lifecycle
        .bookings_for_owner(seller_actor)
        .map_err(demo_failure)?;
    println!(
        "  seller queue: {} request(s), first from {}",
        queue.len(),
        queue[0].farmer_name
    );

    let decided = services
        .lifecycle
        .decide_booking(seller_actor, booking.id, DecisionOutcome::Accepted)
        .map_err(demo_failure)?;
    println!("  seller accepted -> {}", decided.status.label());

    match services
        .lifecycle
        .decide_booking(seller_actor, booking.id, DecisionOutcome::Rejected)
    {
        Err(err) => println!("  re-decide rejected: {err}"),
        Ok(_) => println!("  re-decide unexpectedly succeeded"),
    }

    println!("\nLabour job flow");
    let job = services
        .listings
        .post_job(
            farmer_actor,
            NewLabourJob {
                title: "Wheat harvest help".to_string(),
                skill_required: "Harvesting".to_string(),
                description: "Five acres, sickle harvest".to_string(),
                wage: 500.0,
                duration: "4 days".to_string(),
                location: "Nashik".to_string(),
            },
        )
        .map_err(demo_failure)?;
    println!("  job #{} posted ({})", job.id, job.status.label());

    let application = services
        .lifecycle
        .request_application(
            labourer_actor,
            ApplicationRequest {
                job_id: job.id,
                message: "I have 5 years experience".to_string(),
            },
        )
        .map_err(demo_failure)?;
    println!(
        "  application #{} submitted ({})",
        application.id,
        application.status.label()
    );

    match services.lifecycle.request_application(
        labourer_actor,
        ApplicationRequest {
            job_id: job.id,
            message: "Applying again".to_string(),
        },
    ) {
        Err(err) => println!("  duplicate application rejected: {err}"),
        Ok(_) => println!("  duplicate application unexpectedly succeeded"),
    }

    services
        .lifecycle
        .decide_application(farmer_actor, application.id, DecisionOutcome::Accepted)
        .map_err(demo_failure)?;
    let mine = services
        .lifecycle
        .applications_for_requester(labourer_actor)
        .map_err(demo_failure)?;
    println!(
        "  labourer sees: {} ({} @ {})",
        mine[0].status.label(),
        mine[0].job_title,
        mine[0].wage
    );

    services
        .profiles
        .upsert_profile(
            labourer_actor,
            ProfileDraft {
                skills: vec!["Harvesting".to_string(), "Sowing".to_string()],
                experience_years: 5,
                hourly_rate: 120.0,
                location: "Nashik".to_string(),
                phone: "9876500000".to_string(),
                languages: vec!["Marathi".to_string(), "Hindi".to_string()],
                bio: "Seasonal harvest specialist".to_string(),
                availability: "Mon-Sat".to_string(),
            },
        )
        .map_err(demo_failure)?;
    println!("  labourer profile saved");

    println!("\nMandi price board");
    for quote in services.market.quotes().map_err(demo_failure)? {
        println!(
            "  {}: {} per {} ({})",
            quote.crop_name, quote.price, quote.unit, quote.market_location
        );
    }

    if !args.skip_admin {
        println!("\nAdmin audit");
        let records = services
            .admin
            .all_records("admin", "admin123")
            .map_err(AppError::from)?;
        for (table, rows) in &records {
            println!("  {table}: {} row(s)", rows.len());
        }
    }

    Ok(())
}

fn register(
    services: &Services,
    name: &str,
    email: &str,
    role: UserRole,
) -> Result<User, AppError> {
    let user = services
        .identity
        .register(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: DEMO_PASSWORD.to_string(),
            role,
        })
        .map_err(demo_failure)?;
    println!("  registered {} as {}", user.name, user.role.label());
    Ok(user)
}

fn actor(user: &User) -> Actor {
    Actor {
        id: user.id,
        role: user.role,
    }
}

fn demo_failure<E: std::fmt::Display>(err: E) -> AppError {
    AppError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        err.to_string(),
    ))
}
