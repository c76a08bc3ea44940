use anyhow::{Context, Result};
use clap::Parser;
use gh_client::{ClientManager, GitHubClient};
use gh_pr_config::AppConfig;
use gh_pr_tree::{
    logger, CollapsibleState, DownstreamPullRequestsNode, LogOutput, NodeId, NodeServices,
    NotificationProvider, PrNode, PullRequestModel, PullRequestRef, RefreshSender,
    RepositoryManager, TreeEvent, TreeNode, TreeSnapshot, TreeWidget,
};
use ratatui::{backend::CrosstermBackend, Terminal, TerminalOptions, Viewport};
use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

/// Show the open pull requests stacked on top of a pull request
#[derive(Debug, Parser)]
#[command(name = "gh-pr-downstream", version)]
struct Cli {
    /// Pull request as [host:]owner/repo#number
    pull_request: PullRequestRef,

    /// GitHub host, overrides a host: prefix on the pull request
    #[arg(long)]
    host: Option<String>,

    /// Keep polling and re-render when comments or review threads change
    #[arg(long)]
    watch: bool,

    /// Seconds between polls (overrides watch_interval_secs from the config)
    #[arg(long)]
    interval: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let pull_request = cli.pull_request.on_host(cli.host);

    let log_file = logger::init()?;
    log::info!("Starting gh-pr-downstream (log: {})", log_file.display());

    let config = AppConfig::load();
    let repository = pull_request.repository.clone();

    let mut clients = ClientManager::new();
    let client: Arc<dyn GitHubClient> = clients.get_client(repository.host.as_deref()).await?;

    let repository_manager = Arc::new(RepositoryManager::new(
        Arc::clone(&client),
        repository.clone(),
    ));
    let notifications = Arc::new(NotificationProvider::new(client, repository));
    if let Err(e) = notifications.refresh().await {
        log::warn!("Continuing without notifications: {:#}", e);
    }

    let parent = repository_manager
        .get_pull_request(pull_request.number)
        .await?;
    if let Err(e) = repository_manager.refresh_review_threads(&parent).await {
        log::warn!("{:#}", e);
    }

    let (refresh, mut refresh_rx) = RefreshSender::channel();
    let parent_node = PrNode::new(
        NodeId::next(),
        Arc::clone(&parent),
        Arc::clone(&notifications),
    );
    let downstream = DownstreamPullRequestsNode::new(
        parent_node.id(),
        Arc::clone(&parent),
        NodeServices {
            repository_manager: Arc::clone(&repository_manager),
            notifications,
            refresh,
            logger: Arc::new(LogOutput),
        },
        &config,
    );

    render(&parent_node, &downstream).await?;

    if cli.watch {
        let seconds = cli.interval.unwrap_or(config.watch_interval_secs).max(1);
        log::info!("Watching {} every {}s", pull_request, seconds);

        let mut ticker = tokio::time::interval(Duration::from_secs(seconds));
        // The first tick completes immediately
        ticker.tick().await;

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => break,
                _ = ticker.tick() => poll(&repository_manager, &parent).await,
                Some(TreeEvent::Refresh(id)) = refresh_rx.recv() => {
                    // Comment and review thread changes often arrive together
                    while refresh_rx.try_recv().is_ok() {}
                    if id == downstream.id() {
                        render(&parent_node, &downstream).await?;
                    }
                }
            }
        }
    }

    downstream.dispose();
    log::info!("Exiting gh-pr-downstream");
    Ok(())
}

/// Re-fetch the parent PR; changes reach the tree through its change streams
async fn poll(manager: &RepositoryManager, pull_request: &PullRequestModel) {
    if let Err(e) = manager.refresh_pull_request(pull_request).await {
        log::warn!("{:#}", e);
    }
    if let Err(e) = manager.refresh_review_threads(pull_request).await {
        log::warn!("{:#}", e);
    }
}

async fn render(parent: &PrNode, downstream: &DownstreamPullRequestsNode) -> Result<()> {
    let mut root = parent.tree_item();
    root.collapsible_state = CollapsibleState::Expanded;
    let snapshot = TreeSnapshot {
        item: root,
        children: vec![TreeSnapshot::capture(downstream).await],
    };

    if !io::stdout().is_terminal() {
        for line in snapshot.plain_lines() {
            println!("{}", line);
        }
        println!();
        return Ok(());
    }

    let height = u16::try_from(snapshot.height()).unwrap_or(u16::MAX);
    let mut terminal = Terminal::with_options(
        CrosstermBackend::new(io::stdout()),
        TerminalOptions {
            viewport: Viewport::Inline(height),
        },
    )
    .context("Failed to set up terminal")?;

    terminal
        .draw(|frame| frame.render_widget(TreeWidget::new(&snapshot), frame.area()))
        .context("Failed to draw tree")?;
    println!();
    Ok(())
}
