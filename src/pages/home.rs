use leptos::prelude::*;

use crate::components::cluster_graph::ClusterGraphCanvas;
use crate::layout::{ClusteringResult, DocumentRef, Topic};

const TOPIC_TITLES: &[&str] = &[
	"Retrieval",
	"Embeddings",
	"Evaluation",
	"Prompting",
	"Ingestion",
	"Chunking",
];

/// Sample clustering result with uneven topic sizes.
fn generate_sample_clustering(topics: usize) -> ClusteringResult {
	let topics = (0..topics)
		.map(|i| {
			let documents = 1 + (rand_simple(i) * 5.0) as usize;
			Topic {
				id: format!("topic-{i}"),
				title: TOPIC_TITLES[i % TOPIC_TITLES.len()].to_string(),
				documents: (0..documents)
					.map(|j| DocumentRef {
						id: format!("doc-{i}-{j}"),
						// Every third document is untitled and shows its file name.
						title: (j % 3 != 2).then(|| format!("Document {}.{}", i + 1, j + 1)),
						file_name: format!("upload_{i}_{j}.pdf"),
					})
					.collect(),
			}
		})
		.collect();

	ClusteringResult {
		id: "sample".into(),
		title: "Sample clustering".into(),
		topics,
	}
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let clustering = Signal::derive(move || generate_sample_clustering(4));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<ClusterGraphCanvas clustering=clustering fullscreen=true />
				<div class="graph-overlay">
					<h1>"Document Clusters"</h1>
					<p class="subtitle">"Drag topics or documents to rearrange. Scroll to zoom. Drag background to pan."</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sample_is_stable_and_non_empty() {
		let a = generate_sample_clustering(4);
		assert_eq!(a, generate_sample_clustering(4));
		assert_eq!(a.topics.len(), 4);
		assert!(a.topics.iter().all(|t| (1..=5).contains(&t.documents.len())));
	}
}
