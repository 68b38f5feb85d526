//! Development seeder: wipes and repopulates the database with a set of
//! sample accounts and public business profiles. Every account uses the
//! password "password123".

use chrono::{TimeZone, Utc};
use clap::Parser;

use venture_api::auth::password::hash_password;
use venture_api::database::businesses::{BusinessStore, NewBusiness};
use venture_api::database::manager::DatabaseManager;
use venture_api::database::models::{Business, BusinessField, BusinessStatus, Funder, FundingMethod, SocialMedia};
use venture_api::database::users::UserStore;

#[derive(Parser)]
#[command(name = "seed", about = "Populate the database with sample users and businesses")]
struct Args {
    /// Delete all existing users and businesses before seeding
    #[arg(long)]
    reset: bool,
}

struct SeedBusiness {
    name: &'static str,
    description: &'static str,
    started_at: i32,
    field: BusinessField,
    income: &'static [(i32, f64)],
    funders: &'static [(&'static str, FundingMethod, f64)],
    city: &'static str,
    website: Option<&'static str>,
    phone: &'static str,
    status: BusinessStatus,
    tags: &'static [&'static str],
}

const USERS: &[(&str, &str, BusinessField)] = &[
    ("John Doe", "john.doe@example.com", BusinessField::Agriculture),
    ("Jane Smith", "jane.smith@example.com", BusinessField::Technology),
    ("Dr. Mary Johnson", "mary.johnson@example.com", BusinessField::Healthcare),
    ("David Wilson", "david.wilson@example.com", BusinessField::Education),
    ("Sarah Brown", "sarah.brown@example.com", BusinessField::Finance),
];

const BUSINESSES: &[SeedBusiness] = &[
    SeedBusiness {
        name: "Green Farm Solutions",
        description: "Sustainable agriculture solutions for small-scale farmers in Kenya. We provide organic farming techniques, modern irrigation systems, and crop management services.",
        started_at: 2020,
        field: BusinessField::Agriculture,
        income: &[(2020, 50000.0), (2021, 75000.0), (2022, 120000.0), (2023, 180000.0)],
        funders: &[
            ("AgriBank Kenya", FundingMethod::Loan, 100000.0),
            ("Green Initiative Fund", FundingMethod::Grant, 50000.0),
        ],
        city: "Nairobi",
        website: Some("https://greenfarm.co.ke"),
        phone: "+254 700 123 456",
        status: BusinessStatus::Active,
        tags: &["organic", "sustainable", "irrigation"],
    },
    SeedBusiness {
        name: "TechStart Kenya",
        description: "Mobile app development company specializing in fintech and e-commerce solutions for African markets. We build scalable applications for businesses.",
        started_at: 2019,
        field: BusinessField::Technology,
        income: &[(2019, 30000.0), (2020, 85000.0), (2021, 150000.0), (2022, 220000.0), (2023, 300000.0)],
        funders: &[
            ("Tech Accelerator Africa", FundingMethod::Investment, 200000.0),
            ("Innovation Fund", FundingMethod::Grant, 75000.0),
        ],
        city: "Nairobi",
        website: Some("https://techstart.co.ke"),
        phone: "+254 700 234 567",
        status: BusinessStatus::Expanding,
        tags: &["mobile", "fintech", "ecommerce"],
    },
    SeedBusiness {
        name: "HealthCare Plus",
        description: "Affordable healthcare services for rural communities. We provide telemedicine consultations, mobile clinics, and health education programs.",
        started_at: 2021,
        field: BusinessField::Healthcare,
        income: &[(2021, 40000.0), (2022, 90000.0), (2023, 140000.0)],
        funders: &[
            ("Health Foundation Kenya", FundingMethod::Grant, 120000.0),
            ("Community Development Bank", FundingMethod::Loan, 80000.0),
        ],
        city: "Kisumu",
        website: None,
        phone: "+254 700 345 678",
        status: BusinessStatus::Active,
        tags: &["telemedicine", "rural", "community"],
    },
    SeedBusiness {
        name: "EduTech Solutions",
        description: "Digital learning platform providing online courses and educational content for K-12 students in Kenya. Interactive learning with local curriculum focus.",
        started_at: 2022,
        field: BusinessField::Education,
        income: &[(2022, 25000.0), (2023, 60000.0)],
        funders: &[("Education Innovation Fund", FundingMethod::Grant, 40000.0)],
        city: "Mombasa",
        website: Some("https://edutech.co.ke"),
        phone: "+254 700 456 789",
        status: BusinessStatus::SeekingInvestment,
        tags: &["education", "online", "k12"],
    },
    SeedBusiness {
        name: "FinServe Micro",
        description: "Microfinance institution providing small loans and financial services to women entrepreneurs and small business owners in rural areas.",
        started_at: 2018,
        field: BusinessField::Finance,
        income: &[
            (2018, 80000.0),
            (2019, 120000.0),
            (2020, 95000.0),
            (2021, 160000.0),
            (2022, 200000.0),
            (2023, 250000.0),
        ],
        funders: &[("Women Empowerment Fund", FundingMethod::Grant, 150000.0)],
        city: "Eldoret",
        website: None,
        phone: "+254 700 567 890",
        status: BusinessStatus::Active,
        tags: &["microfinance", "women", "loans"],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    DatabaseManager::migrate().await?;
    let pool = DatabaseManager::pool().await?;

    if args.reset {
        tracing::info!("Clearing existing data");
        sqlx::query("DELETE FROM businesses").execute(&pool).await?;
        sqlx::query("DELETE FROM users").execute(&pool).await?;
    }

    let users = UserStore::with_pool(pool.clone());
    let businesses = BusinessStore::with_pool(pool);

    let password_hash = hash_password("password123")?;

    for ((name, email, field), seed) in USERS.iter().zip(BUSINESSES) {
        if users.find_by_email(email).await?.is_some() {
            tracing::info!("Skipping {} - already seeded", email);
            continue;
        }

        let user = users.create(name, email, &password_hash, *field).await?;

        let business = businesses
            .create(NewBusiness {
                user_id: user.id,
                business_name: seed.name.to_string(),
                description: seed.description.to_string(),
                started_at: seed.started_at,
                business_field: seed.field,
                is_public: true,
                business_logo: None,
                city: Some(seed.city.to_string()),
                country: Some("Kenya".to_string()),
                website: seed.website.map(str::to_string),
                phone_number: Some(seed.phone.to_string()),
                social_media: SocialMedia::default(),
                tags: seed.tags.iter().map(|t| t.to_string()).collect(),
                status: seed.status,
            })
            .await?;

        populate_collections(&businesses, business, seed).await?;

        tracing::info!("Seeded {} with business '{}'", email, seed.name);
    }

    tracing::info!("Seeding complete: {} users, {} businesses", USERS.len(), BUSINESSES.len());
    Ok(())
}

async fn populate_collections(
    store: &BusinessStore,
    mut business: Business,
    seed: &SeedBusiness,
) -> anyhow::Result<()> {
    for &(year, amount) in seed.income {
        business.apply_income_record(year, amount);
    }
    for &(name, method, amount) in seed.funders {
        business.push_funder(Funder {
            name: name.to_string(),
            method,
            amount: Some(amount),
            // Backdate funding to the start of the latest income year
            date_received: Utc
                .with_ymd_and_hms(business.latest_income_year().unwrap_or(seed.started_at), 1, 1, 0, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
        });
    }

    store
        .save_collections(&business)
        .await?
        .ok_or_else(|| anyhow::anyhow!("concurrent modification while seeding '{}'", seed.name))?;

    Ok(())
}
