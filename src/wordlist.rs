//! Compiled scan data: endpoint wordlist and tracked security headers

use crate::models::ScanConfig;
use tracing::info;

/// Security response headers recorded by the headers stage, in output order
pub const SECURITY_HEADERS: [&str; 7] = [
    "X-Frame-Options",
    "X-Content-Type-Options",
    "Strict-Transport-Security",
    "Content-Security-Policy",
    "X-XSS-Protection",
    "Referrer-Policy",
    "Permissions-Policy",
];

/// Candidate paths probed by endpoint discovery, in probe order
#[rustfmt::skip]
pub const ENDPOINTS: &[&str] = &[
    // Main pages
    "/", "/home", "/index", "/index.html", "/index.php",

    // Authentication
    "/login", "/signin", "/sign-in", "/auth", "/authenticate",
    "/register", "/signup", "/sign-up", "/logout",
    "/password-reset", "/forgot-password", "/reset-password",

    // Dashboards and panels
    "/dashboard", "/panel", "/console", "/admin", "/admin/dashboard",
    "/administrator", "/manager", "/user", "/profile",
    "/account", "/settings", "/preferences",

    // CRM
    "/tickets", "/ticket", "/calendar", "/contacts", "/contact",
    "/leads", "/lead", "/customers", "/customer", "/clients", "/client",
    "/opportunities", "/deals", "/pipeline", "/sales",
    "/tasks", "/task", "/activities", "/notes", "/emails",
    "/campaigns", "/marketing",

    // Reports and analytics
    "/reports", "/report", "/analytics", "/statistics",
    "/stats", "/metrics", "/insights", "/charts", "/graphs",

    // Finance
    "/finance", "/financial", "/invoices", "/invoice",
    "/billing", "/payments", "/payment", "/transactions", "/transaction",
    "/revenue", "/expenses", "/expense", "/budget", "/accounting",
    "/subscriptions", "/subscription", "/quotes", "/quote",
    "/orders", "/order", "/products", "/product", "/services", "/service",

    // Public APIs
    "/api", "/api/v1", "/api/v2", "/api/v3",
    "/api/health", "/api/status", "/api/ping",
    "/api/dashboard", "/api/tickets", "/api/calendar",
    "/api/contacts", "/api/users", "/api/user",
    "/api/customers", "/api/leads", "/api/finance",
    "/api/financial", "/api/invoices", "/api/billing",
    "/api/payments", "/api/transactions", "/api/revenue",
    "/api/expenses", "/api/reports", "/api/analytics",
    "/api/auth", "/api/login", "/api/register", "/api/logout",

    // GraphQL
    "/graphql", "/api/graphql", "/graphiql", "/playground",

    // Webhooks
    "/webhook", "/webhooks", "/api/webhook",
    "/api/webhooks", "/hooks", "/callback", "/callbacks",

    // Documentation
    "/docs", "/documentation", "/api-docs", "/swagger",
    "/swagger-ui", "/api/docs", "/help", "/support", "/faq",

    // Common static files
    "/robots.txt", "/sitemap.xml", "/favicon.ico", "/manifest.json",

    // Configuration files
    "/.env", "/.env.local", "/.env.production", "/.env.development",
    "/config", "/config.json", "/config.php", "/config.yml", "/config.yaml",
    "/configuration.php", "/settings.php", "/wp-config.php",
    "/.git", "/.git/config", "/.git/HEAD", "/.gitignore",
    "/.svn", "/.hg", "/.DS_Store",

    // Backups and temporary files
    "/backup", "/backups", "/backup.sql", "/backup.zip",
    "/dump.sql", "/database.sql", "/db.sql",
    "/temp", "/tmp", "/cache", "/.cache", "/old", "/test", "/tests",
    "/testing", "/dev", "/development",

    // Debug and logs
    "/debug", "/debug.log", "/error.log", "/errors.log", "/access.log",
    "/logs", "/log", "/.log", "/phpinfo.php", "/info.php",
    "/test.php", "/debug.php", "/_debug", "/__debug",
    "/console", "/shell",

    // Alternate admin panels
    "/admin.php", "/admin/", "/admin/index.php", "/administrator/",
    "/admin/login", "/admin/login.php", "/admincp", "/modcp",
    "/moderator", "/wp-admin", "/wp-login.php",
    "/phpmyadmin", "/phpMyAdmin", "/pma", "/mysql",
    "/dbadmin", "/adminer.php", "/adminer",

    // Internal APIs
    "/api/internal", "/api/private", "/api/admin",
    "/api/debug", "/api/test", "/api/dev",
    "/internal", "/private", "/_api", "/__api",

    // Uploads
    "/upload", "/uploads", "/uploaded", "/files", "/file",
    "/media", "/images", "/img", "/assets", "/public",
    "/static", "/downloads", "/download", "/attachments",

    // Status pages
    "/status", "/health", "/healthcheck", "/health-check",
    "/ping", "/version", "/info", "/server-status", "/server-info",

    // Installers
    "/install", "/install.php", "/setup", "/setup.php",
    "/installer", "/upgrade", "/migration", "/init",

    // Users and profiles
    "/users", "/user/1", "/user/admin", "/profiles",
    "/profile/1", "/accounts", "/members", "/member",

    // Export and import
    "/export", "/import", "/api/export", "/api/import",
    "/download/export", "/backup/download",

    // Search
    "/search", "/find", "/query", "/filter",

    // Notifications
    "/notifications", "/notification", "/alerts",
    "/messages", "/message", "/inbox",

    // Integrations
    "/integrations", "/integration", "/plugins", "/plugin",
    "/modules", "/module", "/extensions", "/addons",

    // Permissions
    "/permissions", "/roles", "/access", "/groups", "/teams", "/team",

    // Audit
    "/audit", "/audit-log", "/activity-log", "/history", "/changelog",

    // Jobs
    "/cron", "/cronjob", "/jobs", "/queue", "/worker", "/scheduler",

    // Realtime
    "/socket.io", "/ws", "/websocket", "/realtime", "/stream",

    // Mobile
    "/api/mobile", "/mobile", "/app", "/api/app",

    // Error pages
    "/404", "/500", "/error", "/error.html",

    // Other sensitive files
    "/.well-known", "/.well-known/security.txt", "/security.txt",
    "/crossdomain.xml", "/clientaccesspolicy.xml",
    "/elmah.axd", "/trace.axd", "/web.config", "/.htaccess",
    "/composer.json", "/package.json", "/package-lock.json",
    "/yarn.lock", "/.npmrc", "/Dockerfile",
    "/docker-compose.yml", "/.dockerignore",
    "/Makefile", "/README.md", "/LICENSE",
    "/.editorconfig", "/phpunit.xml", "/.phpunit.result.cache",
];

/// Returns the wordlist for a scan.
///
/// A configured wordlist file replaces the compiled list: one path per line,
/// blank lines and `#` comments skipped, order preserved.
pub fn load(config: &ScanConfig) -> Vec<String> {
    let Some(path) = config.wordlist_path.as_deref() else {
        return compiled();
    };

    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content),
        Err(e) => {
            info!("Could not load wordlist from {path} ({e}), using built-in wordlist");
            compiled()
        }
    }
}

/// The compiled wordlist as owned strings
pub fn compiled() -> Vec<String> {
    ENDPOINTS.iter().map(|p| p.to_string()).collect()
}

fn parse(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}
