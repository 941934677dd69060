//! PageRank over documents and authors as one node set
//!
//! Measures global importance in the graph rather than importance for a
//! topic: no relevance prior is involved, iteration 0 is uniform over all
//! `N = |documents| + |authors|` nodes and every node teleports `(1-d)/N`.

use super::channels::{
    author_channel, citation_channel, collaboration_channel, document_channel, UniformWeights,
};
use super::{Generation, ModelKind, PageRankParams, PropagationModel};
use crate::graph::GraphView;
use crate::logspace::product;
use crate::scores::ScoreVector;
use expertrank_common::errors::Result;

/// Two-node-type PageRank with citation, collaboration and authorship links
#[derive(Debug, Clone, Copy)]
pub struct PageRank {
    params: PageRankParams,
}

impl PageRank {
    pub fn new(params: PageRankParams) -> Result<Self> {
        Ok(Self {
            params: params.validated()?,
        })
    }

    fn teleport<G: GraphView + ?Sized>(&self, graph: &G) -> f64 {
        let n = graph.documents().len() + graph.authors().len();
        if n == 0 {
            return 0.0;
        }
        (1.0 - self.params.damping()) / n as f64
    }
}

impl PropagationModel for PageRank {
    fn kind(&self) -> ModelKind {
        ModelKind::PageRank
    }

    fn initialize<G: GraphView + ?Sized>(&self, graph: &G) -> Result<Generation> {
        let n = graph.documents().len() + graph.authors().len();
        let uniform = if n == 0 { 0.0 } else { 1.0 / n as f64 };
        Ok(Generation {
            documents: ScoreVector::filled(graph.documents(), uniform),
            authors: ScoreVector::filled(graph.authors(), uniform),
        })
    }

    fn update_document<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        document: &str,
        previous: &Generation,
    ) -> Result<f64> {
        let incoming = citation_channel(graph, &UniformWeights, document, previous)?
            + author_channel(graph, &UniformWeights, document, previous)?;
        Ok(self.teleport(graph) + product(self.params.damping(), incoming))
    }

    fn update_author<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        author: &str,
        previous: &Generation,
    ) -> Result<f64> {
        // Every written document contributes; contributions accumulate
        let incoming = collaboration_channel(graph, &UniformWeights, author, previous)?
            + document_channel(graph, &UniformWeights, author, previous)?;
        Ok(self.teleport(graph) + product(self.params.damping(), incoming))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::models::testing;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_initial_scores_uniform_over_all_nodes() {
        let (graph, _) = testing::small_library();
        let model = PageRank::new(PageRankParams::new(0.85).unwrap()).unwrap();
        let generation = model.initialize(&graph).unwrap();

        // 5 documents + 4 authors
        let expected = 1.0 / 9.0;
        assert!(generation.documents.iter().all(|(_, s)| s == expected));
        assert!(generation.authors.iter().all(|(_, s)| s == expected));
        assert!(close(generation.documents.total() + generation.authors.total(), 1.0));
    }

    #[test]
    fn test_document_update() {
        // d2 cites d1 and d3; d1 written by a1, who also wrote d4
        let mut builder = GraphBuilder::new();
        builder
            .citation("d2", "d1")
            .citation("d2", "d3")
            .authorship("d1", "a1")
            .authorship("d4", "a1");
        let graph = builder.build().unwrap();
        let model = PageRank::new(PageRankParams::new(0.85).unwrap()).unwrap();
        let start = model.initialize(&graph).unwrap();

        // N = 5, everything at 0.2
        let expected = 0.15 / 5.0 + 0.85 * (0.2 / 2.0 + 0.2 / 2.0);
        assert!(close(model.update_document(&graph, "d1", &start).unwrap(), expected));

        // d2 receives nothing
        assert!(close(model.update_document(&graph, "d2", &start).unwrap(), 0.03));
    }

    #[test]
    fn test_author_update_accumulates_documents() {
        let mut builder = GraphBuilder::new();
        builder
            .authorship("d1", "a1")
            .authorship("d2", "a1")
            .authorship("d3", "a1")
            .authorship("d3", "a2");
        let graph = builder.build().unwrap();
        let model = PageRank::new(PageRankParams::new(0.5).unwrap()).unwrap();

        let previous = Generation {
            documents: [
                ("d1".to_string(), 0.2),
                ("d2".to_string(), 0.3),
                ("d3".to_string(), 0.4),
            ]
            .into_iter()
            .collect(),
            authors: ScoreVector::filled(graph.authors(), 0.0),
        };

        // All three documents count, d3 split between its two authors
        let expected = 0.5 / 5.0 + 0.5 * (0.2 + 0.3 + 0.4 / 2.0);
        assert!(close(model.update_author(&graph, "a1", &previous).unwrap(), expected));
    }

    #[test]
    fn test_empty_graph() {
        let graph = GraphBuilder::new().build().unwrap();
        let model = PageRank::new(PageRankParams::new(0.85).unwrap()).unwrap();
        let generation = model.initialize(&graph).unwrap();
        assert!(generation.documents.is_empty());
        assert!(generation.authors.is_empty());
    }
}
