use clap::{Parser, Subcommand};
use eyre::WrapErr;

use catalog_server::models::user::User;
use catalog_server::seeder;
use catalog_server::services::user_service;
use catalog_server::store::{PgStore, Store};

#[derive(Parser)]
#[command(name = "catalog-admin", about = "Catalog operator tools")]
struct Cli {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an admin, or reset the password of an existing one
    #[command(name = "create-admin")]
    CreateAdmin {
        email: String,
        password: String,
        #[arg(long, default_value = user_service::DEFAULT_ADMIN_NAME)]
        name: String,
    },
    /// Delete a user by email
    #[command(name = "delete-user")]
    DeleteUser { email: String },
    /// List registered users
    #[command(name = "list-users")]
    ListUsers,
    /// Load the built-in catalog
    Seed,
    /// Run the schema migration only
    Migrate,
}

async fn open_store(database_url: Option<&str>) -> eyre::Result<PgStore> {
    let url = database_url.ok_or_else(|| eyre::eyre!("DATABASE_URL is not set (use --database-url)"))?;
    let store = PgStore::connect(url, 2).map_err(|e| eyre::eyre!("{e:#}"))?;
    store
        .run_migrations()
        .await
        .map_err(|e| eyre::eyre!("{e:#}"))?;
    Ok(store)
}

fn users_table(users: &[User]) -> String {
    let email_width = users
        .iter()
        .map(|u| u.email.len())
        .chain(std::iter::once("email".len()))
        .max()
        .unwrap_or_default();

    let mut out = format!("{:<36}  {:<email_width$}  name\n", "id", "email");
    for user in users {
        out.push_str(&format!(
            "{:<36}  {:<email_width$}  {}\n",
            user.id, user.email, user.name
        ));
    }
    out
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let Cli {
        database_url,
        command,
    } = Cli::parse();

    let store = open_store(database_url.as_deref()).await?;

    match command {
        Command::CreateAdmin {
            email,
            password,
            name,
        } => {
            println!("Creating admin user: {email}...");
            let user = user_service::upsert_admin(&store, &email, &password, &name)
                .await
                .wrap_err("creating admin user")?;
            println!("-----------------------------------");
            println!("SUCCESS: Admin user '{}' is ready.", user.email);
            println!("You can now log in to the admin panel.");
            println!("-----------------------------------");
        }
        Command::DeleteUser { email } => {
            let email = user_service::normalize_email(&email);
            if store.delete_user_by_email(&email).await? {
                println!("SUCCESS: User '{email}' deleted.");
            } else {
                println!("User not found: {email}");
            }
        }
        Command::ListUsers => {
            let users = store.list_users().await?;
            println!("Registered Users:");
            print!("{}", users_table(&users));
        }
        Command::Seed => {
            let report = seeder::seed_catalog(&store)
                .await
                .map_err(|e| eyre::eyre!("{e:#}"))?;
            println!(
                "Seeded built-in catalog: {} inserted, {} already present.",
                report.inserted, report.skipped
            );
        }
        Command::Migrate => {
            println!("Schema is up to date.");
        }
    }

    Ok(())
}
