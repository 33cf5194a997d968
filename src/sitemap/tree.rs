// src/sitemap/tree.rs
// =============================================================================
// Builds the site hierarchy implied by a list of URLs.
//
// Each URL contributes a chain of nodes, one per path segment:
//   https://example.com/blog/2024/post
//   -> https://example.com
//   -> https://example.com/blog
//   -> https://example.com/blog/2024
//   -> https://example.com/blog/2024/post
//
// Intermediate nodes are created even if that page was never crawled, so the
// tree always connects back to the site root. BTreeMap/BTreeSet keep the
// rendering stable from run to run.
// =============================================================================

use std::collections::{BTreeMap, BTreeSet};

use url::Url;

#[derive(Debug, Default)]
pub struct SiteTree {
    roots: BTreeSet<String>,
    children: BTreeMap<String, BTreeSet<String>>,
}

impl SiteTree {
    /// Builds the tree from any list of URL strings. Unparseable entries
    /// are skipped.
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::default();

        for raw in urls {
            let Ok(url) = Url::parse(raw.as_ref().trim()) else {
                continue;
            };
            let root = url.origin().ascii_serialization();
            if root == "null" {
                continue;
            }

            let mut current = root.clone();
            tree.roots.insert(root);
            tree.children.entry(current.clone()).or_default();

            for segment in url.path().split('/').filter(|s| !s.is_empty()) {
                let next = format!("{current}/{segment}");
                tree.children
                    .entry(current)
                    .or_default()
                    .insert(next.clone());
                tree.children.entry(next.clone()).or_default();
                current = next;
            }
        }

        tree
    }

    /// Parent -> child pairs, parents in sorted order.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.children
            .iter()
            .flat_map(|(parent, kids)| kids.iter().map(move |kid| (parent.as_str(), kid.as_str())))
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.children.len()
    }

    /// Indented text rendering, one node per line. Roots are shown in
    /// full, every other node by its last path segment.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for root in &self.roots {
            out.push_str(root);
            out.push('\n');
            self.render_children(root, 1, &mut out);
        }
        out
    }

    fn render_children(&self, node: &str, depth: usize, out: &mut String) {
        let Some(kids) = self.children.get(node) else {
            return;
        };
        for kid in kids {
            let label = kid.rsplit('/').next().unwrap_or(kid);
            out.push_str(&"  ".repeat(depth));
            out.push_str(label);
            out.push('\n');
            self.render_children(kid, depth + 1, out);
        }
    }
}
