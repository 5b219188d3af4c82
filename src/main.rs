use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use stay_scout::api::{ApiConfig, FileTokenStore, HttpApi};
use stay_scout::models::{CityName, Credentials, NewComment, OfferSummary};
use stay_scout::store::guard::require_auth;
use stay_scout::store::{
    selectors, sort_offers, thunks, FavoriteContext, PageGuard, PageView, SortKind, Store,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stay-scout", version, about = "Browse short-term rental offers city by city")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List offers in a city
    List {
        #[arg(default_value = "Paris")]
        city: CityName,
        /// popular, price-low-to-high, price-high-to-low or top-rated-first
        #[arg(long, default_value = "popular")]
        sort: SortKind,
    },
    /// Show one offer with nearby places and reviews
    Offer { id: String },
    /// List saved offers, grouped by city
    Favorites,
    /// Add an offer to favorites (or remove it with --remove)
    Favorite {
        id: String,
        #[arg(long)]
        remove: bool,
    },
    /// Post a review for an offer
    Review {
        offer_id: String,
        #[arg(long)]
        rating: u8,
        text: String,
    },
    Login {
        email: String,
        #[arg(long, env = "STAY_SCOUT_PASSWORD")]
        password: String,
    },
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = ApiConfig::from_env();
    info!("🏠 Stay Scout - {}", config.base_url);

    let tokens = Arc::new(FileTokenStore::new(&config.token_path));
    let api = HttpApi::new(config, tokens).context("Failed to create HTTP client")?;
    let store = Store::new();

    thunks::bootstrap(&store, &api).await;

    match cli.command {
        Command::List { city, sort } => list(&store, city, sort),
        Command::Offer { id } => show_offer(&store, &api, &id).await,
        Command::Favorites => favorites(&store, &api).await,
        Command::Favorite { id, remove } => {
            let context = FavoriteContext::PlaceCard;
            let offer = thunks::toggle_favorite(&store, &api, &id, !remove, context)
                .await
                .context("Failed to update favorites")?;
            let verb = if offer.is_favorite { "Saved" } else { "Removed" };
            println!("{} \"{}\"", verb, offer.title);
            Ok(())
        }
        Command::Review { offer_id, rating, text } => {
            let comment = NewComment::new(text, rating);
            let posted = thunks::post_comment(&store, &api, &offer_id, &comment)
                .await
                .context("Failed to post review")?;
            println!("Posted review {} on offer {}", posted.id, offer_id);
            Ok(())
        }
        Command::Login { email, password } => {
            let user = thunks::login(&store, &api, &Credentials { email, password })
                .await
                .context("Login failed")?;
            println!("Signed in as {}{}", user.email, if user.is_pro { " (Pro)" } else { "" });
            Ok(())
        }
        Command::Logout => {
            thunks::logout(&store, &api).await.context("Logout failed")?;
            println!("Signed out");
            Ok(())
        }
    }
}

fn list(store: &Store, city: CityName, sort: SortKind) -> anyhow::Result<()> {
    thunks::select_city(store, city);

    let offers = store.select(selectors::offers_in_city);
    let status = store.select(|state| state.offers.status());

    match PageGuard::redirecting().evaluate(status, offers.is_empty()) {
        PageView::Content => {
            println!("{} places to stay in {} ({})\n", offers.len(), city, sort);
            for (i, offer) in sort_offers(&offers, sort).iter().enumerate() {
                print_offer(i + 1, offer);
            }
        }
        PageView::Empty => println!("No places to stay available in {}", city),
        PageView::Redirect(route) => bail!("Could not load offers (-> {})", route.path()),
        PageView::Loading | PageView::Refetch => bail!("Offers are still loading"),
    }
    Ok(())
}

async fn show_offer(store: &Store, api: &HttpApi, id: &str) -> anyhow::Result<()> {
    let _ = thunks::open_offer(store, api, id).await;
    let state = store.state();

    match PageGuard::redirecting().evaluate(state.offer.status(), state.offer.offer.is_none()) {
        PageView::Content => {}
        PageView::Redirect(route) => bail!("Offer {} not found (-> {})", id, route.path()),
        _ => bail!("Offer {} is not available", id),
    }

    if let Some(offer) = selectors::offer(&state) {
        let premium = if offer.is_premium { "  [Premium]" } else { "" };
        let pro = if offer.host.is_pro { " (Pro)" } else { "" };

        println!("{}{}", offer.title, premium);
        println!(
            "   {} · {} bedrooms · max {} adults",
            offer.kind, offer.bedrooms, offer.max_adults
        );
        println!("   €{} / night, rated {}", offer.price, offer.rating);
        println!("   Host: {}{}", offer.host.name, pro);
        println!("   Inside: {}", offer.goods.join(", "));
        println!("   {}", offer.description);
        println!();
    }

    let nearby = selectors::filtered_nearby(&state);
    if !nearby.is_empty() {
        println!(
            "Other places in the neighbourhood ({} map points):",
            selectors::map_points(&state).len()
        );
        for (i, offer) in nearby.iter().enumerate() {
            print_offer(i + 1, offer);
        }
    }

    if selectors::is_authorized(&state) && !selectors::comments_error(&state) {
        println!("Reviews · {}", selectors::total_comments(&state));
        for review in selectors::reviews(&state) {
            println!(
                "   {} ({}★, {}): {}",
                review.user.name,
                review.rating,
                review.date.format("%B %Y"),
                review.comment
            );
        }
    }

    thunks::close_offer(store);
    Ok(())
}

async fn favorites(store: &Store, api: &HttpApi) -> anyhow::Result<()> {
    if require_auth(store.select(selectors::authorization_status)).is_err() {
        bail!("Sign in first: stay-scout login <email>");
    }

    let mut guard = PageGuard::refetching(1);
    loop {
        let status = store.select(|state| state.favorites.status());
        let is_empty = store.select(|state| state.favorites.favorites.is_empty());

        match guard.evaluate(status, is_empty) {
            PageView::Refetch => {
                let _ = thunks::fetch_favorites(store, api).await;
            }
            PageView::Content => {
                println!("Saved listing\n");
                for city in store.select(selectors::favorite_cities) {
                    println!("{}", city);
                    let in_city = store.select(|state| selectors::favorites_in_city(state, city));
                    for (i, offer) in in_city.iter().enumerate() {
                        print_offer(i + 1, offer);
                    }
                }
                return Ok(());
            }
            PageView::Empty => {
                println!(
                    "Nothing yet saved. \
                     Save properties to narrow down search or plan your future trips."
                );
                return Ok(());
            }
            PageView::Redirect(route) => bail!("Could not load favorites (-> {})", route.path()),
            PageView::Loading => bail!("Favorites are still loading"),
        }
    }
}

fn print_offer(position: usize, offer: &OfferSummary) {
    println!("{}. {} (€{} / night)", position, offer.title, offer.price);
    let premium = if offer.is_premium { " · Premium" } else { "" };
    println!("   {} · rated {}{}", offer.kind, offer.rating, premium);
    if offer.is_favorite {
        println!("   In bookmarks");
    }
    println!("   ID: {}", offer.id);
    println!();
}
