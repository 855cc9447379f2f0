use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use stay_scout::booking;
use stay_scout::compare;
use stay_scout::config::{self, Config};
use stay_scout::models::{Property, PropertyType, ReviewAuthor};
use stay_scout::search::{self, SearchFilters, SortBy};
use stay_scout::services::{
    with_review_stats, NewReview, ReviewService, ReviewSort, WishlistService,
};
use stay_scout::sources::{self, PropertySource};
use stay_scout::storage::{FileStore, KeyValueStore};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Browse, save, compare and review rental properties
#[derive(Parser, Debug)]
#[command(name = "stay-scout", version)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search listings
    Search(SearchArgs),
    /// Show one listing with its review summary
    Show { id: String },
    /// Manage saved listings
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Read and write reviews
    Reviews {
        #[command(subcommand)]
        action: ReviewAction,
    },
    /// Compare 2-4 listings side by side
    Compare {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Price a stay
    Quote {
        id: String,
        #[arg(long)]
        check_in: NaiveDate,
        #[arg(long)]
        check_out: NaiveDate,
        #[arg(long, default_value_t = 1)]
        guests: u32,
    },
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Title, city, country or address fragment
    #[arg(short, long)]
    location: Option<String>,
    #[arg(long)]
    min_price: Option<u32>,
    #[arg(long)]
    max_price: Option<u32>,
    /// Property type, repeatable
    #[arg(long = "type")]
    types: Vec<PropertyType>,
    /// Required amenity, repeatable
    #[arg(long = "amenity")]
    amenities: Vec<String>,
    #[arg(short, long)]
    guests: Option<u32>,
    #[arg(long)]
    min_bedrooms: Option<u32>,
    #[arg(long)]
    min_rating: Option<f32>,
    #[arg(long, default_value_t = SortBy::Recommended)]
    sort: SortBy,
    #[arg(long, default_value_t = 1)]
    page: usize,
}

impl SearchArgs {
    fn filters(&self) -> SearchFilters {
        SearchFilters {
            location: self.location.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            property_types: self.types.iter().copied().collect(),
            amenities: self.amenities.iter().cloned().collect(),
            guests: self.guests,
            min_bedrooms: self.min_bedrooms,
            min_rating: self.min_rating,
        }
    }
}

#[derive(Subcommand, Debug)]
enum WishlistAction {
    Add { id: String },
    Remove { id: String },
    Toggle { id: String },
    List,
    Clear,
}

#[derive(Subcommand, Debug)]
enum ReviewAction {
    List {
        property_id: String,
        #[arg(long, default_value_t = ReviewSort::Newest)]
        sort: ReviewSort,
    },
    Add {
        property_id: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        rating: u8,
        /// Optional headline
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long)]
        comment: String,
    },
    Helpful { review_id: String },
    Delete { review_id: String },
    Summary { property_id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("❌ {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::read_config()?;
    debug!(
        "Loaded config: source={:?}, storage={}",
        config.data_source,
        config.storage_dir.display()
    );

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.storage_dir.clone()));
    let json = cli.json;

    match cli.command {
        Command::Search(args) => {
            let source = sources::connect(&config).await?;
            run_search(source.as_ref(), &config, &args, json).await
        }
        Command::Show { id } => {
            let source = sources::connect(&config).await?;
            let property = fetch(source.as_ref(), &id).await?;
            let summary = ReviewService::new(store.clone()).summary(&id).await?;
            let property = with_review_stats(property, &summary);
            let saved = WishlistService::new(store).contains(&id).await?;
            if json {
                return print_json(&serde_json::json!({
                    "property": property,
                    "reviews": summary,
                    "wishlisted": saved,
                }));
            }
            print_details(&property);
            println!(
                "   Reviews: {:.1} avg over {} ({:?} by star)",
                summary.average, summary.count, summary.distribution
            );
            if saved {
                println!("   ♥ In your wishlist");
            }
            Ok(())
        }
        Command::Wishlist { action } => run_wishlist(action, store, &config, json).await,
        Command::Reviews { action } => run_reviews(action, store, json).await,
        Command::Compare { ids } => {
            let source = sources::connect(&config).await?;
            let mut properties = Vec::with_capacity(ids.len());
            for id in &ids {
                properties.push(fetch(source.as_ref(), id).await?);
            }
            let comparison = compare::compare(&properties)?;
            if json {
                return print_json(&comparison);
            }
            for p in &comparison.properties {
                print_summary(p);
            }
            println!("Cheapest:     {}", comparison.cheapest);
            println!("Best rated:   {}", comparison.best_rated);
            println!("Most guests:  {}", comparison.most_guests);
            println!("Shared:       {}", join(&comparison.shared_amenities));
            for (id, only) in &comparison.unique_amenities {
                println!("Only {}: {}", id, join(only));
            }
            Ok(())
        }
        Command::Quote {
            id,
            check_in,
            check_out,
            guests,
        } => {
            let source = sources::connect(&config).await?;
            let property = fetch(source.as_ref(), &id).await?;
            let quote = booking::quote(&property, check_in, check_out, guests)?;
            if json {
                return print_json(&quote);
            }
            println!("{} ({} → {}, {} guests)", property.title, check_in, check_out, guests);
            println!(
                "   {} {} x {} nights = {} {}",
                quote.nightly_rate, quote.currency, quote.nights, quote.subtotal, quote.currency
            );
            println!("   Cleaning fee: {} {}", quote.cleaning_fee, quote.currency);
            println!("   Service fee:  {} {}", quote.service_fee, quote.currency);
            println!("   Total:        {} {}", quote.total, quote.currency);
            Ok(())
        }
    }
}

async fn run_search(
    source: &dyn PropertySource,
    config: &Config,
    args: &SearchArgs,
    json: bool,
) -> Result<()> {
    info!("Searching {} listings...", source.source_name());
    let properties = source.list_properties().await?;
    let page = search::search(
        &properties,
        &args.filters(),
        args.sort,
        args.page,
        config.page_size,
    );

    if json {
        return print_json(&page);
    }

    info!(
        "✅ {} matches, page {}/{}",
        page.total,
        page.page,
        page.total_pages.max(1)
    );
    for (i, property) in page.items.iter().enumerate() {
        print!("{}. ", (page.page - 1) * page.per_page + i + 1);
        print_summary(property);
    }
    Ok(())
}

async fn run_wishlist(
    action: WishlistAction,
    store: Arc<dyn KeyValueStore>,
    config: &Config,
    json: bool,
) -> Result<()> {
    let wishlist = WishlistService::new(store);

    match action {
        WishlistAction::Add { id } => {
            let source = sources::connect(config).await?;
            if wishlist.add_listed(&id, source.as_ref()).await? {
                println!("♥ Saved {id}");
            } else {
                println!("{id} is already in your wishlist");
            }
        }
        WishlistAction::Remove { id } => {
            if wishlist.remove(&id).await? {
                println!("Removed {id}");
            } else {
                println!("{id} was not in your wishlist");
            }
        }
        WishlistAction::Toggle { id } => {
            let source = sources::connect(config).await?;
            if wishlist.toggle_listed(&id, source.as_ref()).await? {
                println!("♥ Saved {id}");
            } else {
                println!("Removed {id}");
            }
        }
        WishlistAction::List => {
            let source = sources::connect(config).await?;
            let properties = wishlist.resolve(source.as_ref()).await?;
            if json {
                return print_json(&properties);
            }
            if properties.is_empty() {
                println!("Your wishlist is empty");
            }
            for property in &properties {
                print_summary(property);
            }
        }
        WishlistAction::Clear => {
            wishlist.clear().await?;
            println!("Wishlist cleared");
        }
    }
    Ok(())
}

async fn run_reviews(action: ReviewAction, store: Arc<dyn KeyValueStore>, json: bool) -> Result<()> {
    let reviews = ReviewService::new(store);

    match action {
        ReviewAction::List { property_id, sort } => {
            let listed = reviews.list_for_property(&property_id, sort).await?;
            if json {
                return print_json(&listed);
            }
            if listed.is_empty() {
                println!("No reviews yet for {property_id}");
            }
            for r in &listed {
                let verified = if r.verified { " ✔ verified" } else { "" };
                println!(
                    "{} {}/5 {}{}",
                    r.created_at.format("%Y-%m-%d"),
                    r.rating,
                    r.title,
                    verified
                );
                println!("   {}", r.comment);
                println!("   by {} · {} found this helpful · id {}", r.author.name, r.helpful, r.id);
                println!();
            }
        }
        ReviewAction::Add {
            property_id,
            author,
            rating,
            title,
            comment,
        } => {
            let review = reviews
                .create(NewReview {
                    property_id,
                    author: ReviewAuthor {
                        name: author,
                        avatar: None,
                    },
                    rating,
                    title,
                    comment,
                    verified: false,
                })
                .await?;
            if json {
                return print_json(&review);
            }
            println!("Review {} posted", review.id);
        }
        ReviewAction::Helpful { review_id } => {
            let count = reviews.mark_helpful(&review_id).await?;
            println!("{count} people found this helpful");
        }
        ReviewAction::Delete { review_id } => {
            reviews.delete(&review_id).await?;
            println!("Review {review_id} deleted");
        }
        ReviewAction::Summary { property_id } => {
            let summary = reviews.summary(&property_id).await?;
            if json {
                return print_json(&summary);
            }
            println!("{:.1} ★ from {} reviews", summary.average, summary.count);
            for (stars, count) in summary.distribution.iter().enumerate().rev() {
                println!("   {} ★  {}", stars + 1, count);
            }
        }
    }
    Ok(())
}

async fn fetch(source: &dyn PropertySource, id: &str) -> Result<Property> {
    source
        .get_property(id)
        .await?
        .with_context(|| format!("Property not found: {id}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn join<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    let joined: Vec<&str> = items.into_iter().map(String::as_str).collect();
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined.join(", ")
    }
}

fn print_summary(property: &Property) {
    println!(
        "{} ({} {}/night)",
        property.title, property.pricing.nightly_rate, property.pricing.currency
    );
    println!(
        "   {} · {}, {} · {} guests",
        property.property_type, property.location.city, property.location.country, property.capacity.guests
    );
    println!("   ★ {:.1} ({} reviews)", property.rating, property.review_count);
    println!("   ID: {}", property.id);
    println!();
}

fn print_details(property: &Property) {
    println!("{}", property.title);
    println!("   {}", property.description);
    println!(
        "   {}, {}, {}",
        property.location.address, property.location.city, property.location.country
    );
    println!(
        "   {} · {} guests · {} bedrooms · {} beds · {} baths",
        property.property_type,
        property.capacity.guests,
        property.capacity.bedrooms,
        property.capacity.beds,
        property.capacity.bathrooms
    );
    println!(
        "   {} {}/night + {} cleaning + {} service",
        property.pricing.nightly_rate,
        property.pricing.currency,
        property.pricing.cleaning_fee,
        property.pricing.service_fee
    );
    println!("   Amenities: {}", join(&property.amenities));
    let superhost = if property.host.superhost { " (superhost)" } else { "" };
    println!("   Host: {}{}", property.host.name, superhost);
    println!("   Images: {}", property.images.len());
    println!("   ★ {:.1} ({} reviews)", property.rating, property.review_count);
}
