use anyhow::{bail, Context, Result};
use blog_client::{BlogClient, BlogClientError, ListParams, Post, UpdatePostRequest};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use uuid::Uuid;

mod token;

use token::TokenManager;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, env = "BLOG_SERVER", default_value = "http://localhost:3000")]
    server: String,

    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Print raw JSON instead of formatted output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and keep its token
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// Forget the saved token
    Logout,

    /// Show the saved token without contacting the server
    Status,

    /// Show the account behind the saved token
    Whoami,

    List {
        #[arg(short, long)]
        page: Option<i64>,

        #[arg(short, long)]
        limit: Option<i64>,

        /// Case-insensitive match on title or author username
        #[arg(short, long)]
        search: Option<String>,

        /// Only posts by this author id
        #[arg(short, long, conflicts_with = "mine")]
        author: Option<Uuid>,

        /// Only posts by the logged-in user
        #[arg(long)]
        mine: bool,
    },

    Get {
        #[arg(short, long)]
        id: Uuid,
    },

    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        content: String,

        #[arg(short, long)]
        image: Option<String>,
    },

    Update {
        #[arg(long)]
        id: Uuid,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        content: Option<String>,

        #[arg(short, long)]
        image: Option<String>,

        /// Remove the post image
        #[arg(long, conflicts_with = "image")]
        clear_image: bool,
    },

    Delete {
        #[arg(short, long)]
        id: Uuid,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        report(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let tokens = TokenManager::new(cli.token_file)?;
    let mut client = BlogClient::new(cli.server);
    client.set_token(tokens.load_token()?);

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
        } => {
            println!("📝 Registering user: {}", username);
            let response = client.register(username, email, password).await?;
            tokens.save_token(&response.token)?;

            println!("{} Registration successful!", "✓".green());
            println!("   User ID: {}", response.user.id);
            println!("   Username: {}", response.user.username);
            println!("   Token saved to {:?}", tokens.path());
        }

        Commands::Login { username, password } => {
            println!("🔑 Logging in as: {}", username);
            let response = client.login(username, password).await?;
            tokens.save_token(&response.token)?;

            println!("{} Login successful!", "✓".green());
            println!("   User ID: {}", response.user.id);
            println!("   Token saved to {:?}", tokens.path());
        }

        Commands::Logout => {
            if tokens.clear_token()? {
                println!("{} Logged out, token removed", "✓".green());
            } else {
                println!("Not logged in");
            }
        }

        Commands::Status => match client.token() {
            Some(saved) => {
                println!("🔑 Token file: {:?}", tokens.path());
                println!("   Token: {}", token::preview(saved, 20));
                println!("   Length: {} characters", saved.len());
                println!("   Use 'whoami' to check it against the server");
            }
            None => {
                println!("No token found");
                println!("   Please login first: blog-cli login --username <username> --password <password>");
            }
        },

        Commands::Whoami => {
            require_login(&client)?;
            let user = client.me().await?;
            if cli.json {
                print_json(&user)?;
            } else {
                println!("{} ({})", user.username.bold(), user.email);
                println!("   User ID: {}", user.id);
                println!("   Member since: {}", local_time(&user.created_at));
            }
        }

        Commands::List {
            page,
            limit,
            search,
            author,
            mine,
        } => {
            let author = if mine {
                require_login(&client)?;
                Some(client.me().await?.id)
            } else {
                author
            };

            let params = ListParams {
                page,
                limit,
                search,
                author,
            };
            let response = client.list_posts(&params).await?;

            if cli.json {
                print_json(&response)?;
                return Ok(());
            }

            let p = &response.pagination;
            println!(
                "📋 Page {} of {} ({} posts total)",
                p.current_page,
                p.total_pages.max(1),
                p.total_posts
            );
            println!();

            if response.items.is_empty() {
                println!("   No posts found");
            }
            for post in &response.items {
                println!("   [{}] {}", post.id, post.title.bold());
                println!(
                    "      by {} on {}",
                    post.author_username,
                    local_time(&post.created_at)
                );
                println!("      {}", truncate(&post.content, 60));
                println!();
            }

            if p.has_next_page {
                println!("   Next: --page {}", p.current_page + 1);
            }
        }

        Commands::Get { id } => {
            let post = client.get_post(id).await?;
            if cli.json {
                print_json(&post)?;
            } else {
                print_post(&post);
            }
        }

        Commands::Create {
            title,
            content,
            image,
        } => {
            require_login(&client)?;
            let post = client.create_post(title, content, image).await?;
            println!("{} Post created successfully!", "✓".green());
            print_post(&post);
        }

        Commands::Update {
            id,
            title,
            content,
            image,
            clear_image,
        } => {
            require_login(&client)?;
            let changes = UpdatePostRequest {
                title,
                content,
                image_url: if clear_image { Some(String::new()) } else { image },
            };
            let post = client.update_post(id, &changes).await?;
            println!("{} Post updated successfully!", "✓".green());
            print_post(&post);
        }

        Commands::Delete { id } => {
            require_login(&client)?;
            let message = client.delete_post(id).await?;
            println!("{} {}", "✓".green(), message);
        }
    }

    Ok(())
}

fn require_login(client: &BlogClient) -> Result<()> {
    if client.token().is_none() {
        bail!("Not logged in. Run 'blog-cli login --username <username> --password <password>' first");
    }
    Ok(())
}

fn report(err: &anyhow::Error) {
    let mark = "✗".red();
    match err.downcast_ref::<BlogClientError>() {
        Some(BlogClientError::Validation(errors)) => {
            eprintln!("{} Validation failed:", mark);
            for e in errors {
                eprintln!("   {}: {}", e.field, e.message);
            }
        }
        Some(BlogClientError::Unauthorized(_)) => {
            eprintln!("{} Session expired or invalid. Please login again", mark);
        }
        Some(BlogClientError::Forbidden(_)) => {
            eprintln!("{} You can only modify your own posts", mark);
        }
        Some(BlogClientError::NotFound(message)) => {
            eprintln!("{} {}", mark, message);
            eprintln!("   Tip: Use 'list' to see available posts");
        }
        Some(e) => eprintln!("{} {}", mark, e),
        None => eprintln!("{} {:#}", mark, err),
    }
}

fn print_post(post: &Post) {
    println!("   ID: {}", post.id);
    println!("   Title: {}", post.title.bold());
    println!("   Author: {} ({})", post.author_username, post.author_id);
    if !post.image_url.is_empty() {
        println!("   Image: {}", post.image_url);
    }
    println!("   Created: {}", local_time(&post.created_at));
    println!("   Updated: {}", local_time(&post.updated_at));
    println!();
    println!("{}", post.content);
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to encode JSON")?;
    println!("{}", text);
    Ok(())
}

fn local_time(at: &chrono::DateTime<chrono::Utc>) -> String {
    at.with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

fn truncate(s: &str, max_chars: usize) -> String {
    let mut chars = s.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
