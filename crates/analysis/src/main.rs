//! CiteNet batch runner
//!
//! One full analysis pass over a corpus snapshot:
//! - Build the co-authorship graph and persist its weighted adjacency
//!   matrix (Matrix Market + node ordering)
//! - Build the combined citation graph from resolved reference and
//!   citation tables
//! - Rank by PageRank, HITS power iteration, HITS eigen-decomposition,
//!   and raw citation counts
//! - When topic keywords are configured, cut the matching subgraph out
//!   of the citation graph and rank it separately
//! - Write rank tables as JSON for the reporting/plotting collaborators

use citenet_analysis::graph::{coauthorship_graph, AdjacencyMatrix, GraphStore};
use citenet_analysis::query::{topic_query_subgraph, CombinePolicy};
use citenet_analysis::ranking::{hits_power_iteration, EigenSolver, PageRank};
use citenet_analysis::snapshot::{self, Snapshot};
use citenet_common::{AppConfig, VERSION};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));
    if config.observability.json_logging {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    info!("Starting CiteNet batch run v{}", VERSION);

    let mut rng = match config.seed {
        Some(seed) => {
            info!(seed, "Using configured random seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let snap = Snapshot::load(&config.snapshot)?;
    let out_dir = Path::new(&config.snapshot.output_dir);
    std::fs::create_dir_all(out_dir)?;

    // ---- Co-authorship graph -------------------------------------------
    let author_lists = snap.attributes.author_lists();
    let coauth = coauthorship_graph(&author_lists);
    info!(
        nodes = coauth.node_count(),
        edges = coauth.edge_count(),
        "Co-authorship graph"
    );

    let coauth_matrix = AdjacencyMatrix::from_graph(&coauth);
    coauth_matrix.save_matrix_market(out_dir.join("adj_mat_auth.mtx"))?;
    snapshot::write_ordering(out_dir.join("adj_mat_auth.nodes.json"), coauth_matrix.ordering())?;

    let pagerank = PageRank::new(config.pagerank.clone());
    let author_scores = pagerank.compute(&coauth_matrix)?;
    if !author_scores.converged {
        warn!(
            iterations = author_scores.iterations,
            residual = author_scores.residual,
            "PageRank hit the iteration cap before the tolerance"
        );
    }
    info!(
        iterations = author_scores.iterations,
        residual = author_scores.residual,
        "Author PageRank done"
    );
    snapshot::write_rank_table(out_dir.join("pagerank_authors.json"), &author_scores.ranking())?;

    // ---- Citation graph --------------------------------------------------
    let store = GraphStore::from_resolved(&snap.all_citation_edges());
    info!(
        nodes = store.graph().node_count(),
        edges = store.graph().edge_count(),
        "Citation graph"
    );

    let cit_matrix = AdjacencyMatrix::from_graph(store.graph());

    let hits = hits_power_iteration(&cit_matrix, config.hits.iterations)?;
    snapshot::write_rank_table(out_dir.join("hits_authorities.json"), &hits.authority_ranking())?;
    snapshot::write_rank_table(out_dir.join("hits_hubs.json"), &hits.hub_ranking())?;

    let solver = EigenSolver::new(config.hits.neigs, config.hits.max_retries);
    match solver.hubs_authorities(&cit_matrix, &mut rng) {
        Ok(eigen) => {
            snapshot::write_rank_table(
                out_dir.join("eigen_authorities.json"),
                &eigen.authority_ranking(),
            )?;
            snapshot::write_rank_table(out_dir.join("eigen_hubs.json"), &eigen.hub_ranking())?;
        }
        Err(e) => {
            // The power-iteration tables above still stand on their own
            warn!(error = %e, "Eigen-decomposition HITS skipped");
        }
    }

    // ---- Topic subgraph --------------------------------------------------
    if !config.query.keywords.is_empty() {
        let how: CombinePolicy = config.query.combine.parse()?;
        let sub = topic_query_subgraph(
            store.graph(),
            &snap.attributes,
            &config.query.keywords,
            &config.query.search_fields,
            how,
            config.query.max_predecessors,
            &mut rng,
        );
        info!(
            keywords = ?config.query.keywords,
            nodes = sub.node_count(),
            edges = sub.edge_count(),
            "Topic subgraph"
        );
        if sub.node_count() == 0 {
            warn!("No articles match the topic keywords, skipping the subgraph ranking");
        } else {
            let sub_matrix = AdjacencyMatrix::from_graph(&sub);
            let sub_hits = hits_power_iteration(&sub_matrix, config.hits.iterations)?;
            snapshot::write_rank_table(
                out_dir.join("query_authorities.json"),
                &sub_hits.authority_ranking(),
            )?;
            snapshot::write_rank_table(out_dir.join("query_hubs.json"), &sub_hits.hub_ranking())?;
        }
    }

    let citation_counts: Vec<(u32, f64)> = store
        .citation_ranking(true)
        .into_iter()
        .map(|(id, cits)| (id, cits as f64))
        .collect();
    snapshot::write_rank_table(out_dir.join("citation_counts.json"), &citation_counts)?;

    info!("Batch run complete");
    Ok(())
}
