use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rental_core::order::{OrderStatus, PaymentStatus};

#[derive(Parser, Debug)]
#[command(author, version, about = "Rental back-office administration")]
pub struct Cli {
    /// Backend API base URL (defaults to RENTAL_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Where the admin session token is kept between commands
    #[arg(long, global = true, env = "RENTAL_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "RENTAL_ADMIN_PASSWORD")]
        password: String,
    },
    /// Sign out and drop the stored session
    Logout,
    /// Exchange the refresh cookie for a new access token
    Refresh,
    /// Show the signed-in admin
    Whoami,
    /// Check whether an admin route would render or redirect
    Guard {
        #[arg(default_value = "/admin/dashboard")]
        path: String,
    },
    /// List bookings
    Orders {
        #[arg(long)]
        status: Option<OrderStatus>,
        #[arg(long)]
        payment: Option<PaymentStatus>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Cancel a booking with an active cancellation reason
    Cancel {
        order_id: String,
        #[arg(long)]
        reason: String,
    },
    /// Set the payment status of a booking
    Payment {
        order_id: String,
        status: PaymentStatus,
    },
    /// Move a booking forward (approved, started, completed)
    Status {
        order_id: String,
        status: OrderStatus,
    },
    /// Delete a booking
    Delete {
        order_id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// List cancellation reasons
    Reasons,
    /// Show dashboard figures
    Dashboard,
    /// Upload a file into a storage folder
    Upload { folder: String, file: PathBuf },
    /// Ping the backend periodically to keep it warm
    Keepalive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payment_command() {
        let cli = Cli::parse_from(["rental-admin", "payment", "o1", "paid"]);
        match cli.command {
            Command::Payment { order_id, status } => {
                assert_eq!(order_id, "o1");
                assert_eq!(status, PaymentStatus::Paid);
            }
            other => panic!("Expected payment command, got: {:?}", other),
        }
    }

    #[test]
    fn test_parse_orders_filters() {
        let cli = Cli::parse_from([
            "rental-admin",
            "--api-url",
            "http://api.test",
            "orders",
            "--status",
            "cancelled",
            "--search",
            "ravi",
        ]);
        assert_eq!(cli.api_url.as_deref(), Some("http://api.test"));
        match cli.command {
            Command::Orders { status, search, limit, .. } => {
                assert_eq!(status, Some(OrderStatus::Cancelled));
                assert_eq!(search.as_deref(), Some("ravi"));
                assert_eq!(limit, 20);
            }
            other => panic!("Expected orders command, got: {:?}", other),
        }
    }

    #[test]
    fn test_parse_refresh_command() {
        let cli = Cli::parse_from(["rental-admin", "--session-file", "/tmp/s.json", "refresh"]);
        assert!(matches!(cli.command, Command::Refresh));
        assert_eq!(cli.session_file, Some(PathBuf::from("/tmp/s.json")));
    }

    #[test]
    fn test_rejects_unknown_payment_status() {
        assert!(Cli::try_parse_from(["rental-admin", "payment", "o1", "refunded"]).is_err());
    }
}
