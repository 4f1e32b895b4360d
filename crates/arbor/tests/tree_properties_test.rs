//! Property tests over generated node trees.

use proptest::prelude::*;

use arbor::{
    DiagramBuilder,
    config::AppConfig,
    dataset::{CodePolicy, Dataset, Forest, LayerSpec},
    model::Node,
    spec::RenderSpec,
    template::LabelTemplates,
};

const CATEGORIES: [&str; 3] = ["person", "event", "course"];

// ===================
// Strategies
// ===================

/// Parent index of every node but the first; node `i` hangs below a node
/// with a smaller index, so the result is always a tree.
fn shape_strategy() -> impl Strategy<Value = Vec<usize>> {
    (1usize..40).prop_flat_map(|len| {
        (0..len)
            .map(|index| 0..index.max(1))
            .collect::<Vec<_>>()
    })
}

fn fields_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(vec!["name", "age", "title", "credits", "date"], 0..=5)
        .prop_shuffle()
        .prop_map(|fields| fields.into_iter().map(str::to_string).collect())
}

// ===================
// Helpers
// ===================

fn build_tree(parents: &[usize], index: usize, attributes: &[String]) -> Node {
    let mut node = Node::new(format!("{index:05}"), CATEGORIES[index % CATEGORIES.len()]);
    for name in attributes {
        node = node.with_attribute(name.as_str(), format!("{name}-{index}"));
    }
    node.with_children(
        (index + 1..parents.len())
            .filter(|&child| parents[child] == index)
            .map(|child| build_tree(parents, child, attributes)),
    )
}

fn forest_dataset(trees: Vec<Node>) -> Dataset {
    let mut dataset = Dataset::new("generated");
    dataset.forests.push(Forest {
        trees,
        ..Forest::default()
    });
    dataset
}

fn build(dataset: &Dataset) -> Result<RenderSpec, TestCaseError> {
    DiagramBuilder::default()
        .build(dataset)
        .map_err(|err| TestCaseError::fail(err.to_string()))
}

// ===================
// Property Test Functions
// ===================

/// A tree of N nodes renders to N nodes and N-1 parent edges.
fn check_tree_node_and_edge_counts(parents: Vec<usize>) -> Result<(), TestCaseError> {
    let tree = build_tree(&parents, 0, &[]);
    let spec = build(&forest_dataset(vec![tree]))?;

    prop_assert_eq!(spec.node_count(), parents.len());
    prop_assert_eq!(spec.edge_count(), parents.len() - 1);
    Ok(())
}

/// Rendering the same tree several times yields each node exactly once.
fn check_repeated_trees_collapse(parents: Vec<usize>, copies: usize) -> Result<(), TestCaseError> {
    let tree = build_tree(&parents, 0, &[]);
    let spec = build(&forest_dataset(vec![tree; copies]))?;

    prop_assert_eq!(spec.node_count(), parents.len());
    prop_assert_eq!(spec.edge_count(), parents.len() - 1);
    Ok(())
}

/// Labels of templated categories list exactly the template's attributes,
/// in template order, after the name and code lines.
fn check_template_order(parents: Vec<usize>, fields: Vec<String>) -> Result<(), TestCaseError> {
    let tree = build_tree(&parents, 0, &fields);
    let mut dataset = forest_dataset(vec![tree]);
    dataset.templates = CATEGORIES
        .iter()
        .fold(LabelTemplates::new(), |templates, category| {
            templates.with_category(*category, fields.iter().map(String::as_str))
        });
    let spec = build(&dataset)?;

    for node in spec.nodes() {
        let parts = node.label().parts();
        prop_assert_eq!(parts.len(), 2 + fields.len());
        let index: usize = parts[1]
            .parse()
            .map_err(|_| TestCaseError::fail(format!("code `{}` is not the id", parts[1])))?;
        for (part, field) in parts[2..].iter().zip(&fields) {
            prop_assert_eq!(part, &format!("{field} : {field}-{index}"));
        }
    }
    Ok(())
}

/// Categories without a template render name and code only, without error.
fn check_undeclared_category_fallback(parents: Vec<usize>) -> Result<(), TestCaseError> {
    let attributes = vec!["name".to_string()];
    let tree = build_tree(&parents, 0, &attributes);
    let spec = build(&forest_dataset(vec![tree]))?;

    for node in spec.nodes() {
        prop_assert_eq!(node.label().parts().len(), 2);
    }
    Ok(())
}

/// The same dataset and seed always print identical DOT.
fn check_deterministic_output(parents: Vec<usize>, seed: u64) -> Result<(), TestCaseError> {
    let tree = build_tree(&parents, 0, &[]);
    let mut dataset = forest_dataset(vec![tree]);
    let mut layer = LayerSpec::new("Italiano");
    layer.codes = CodePolicy::Random;
    layer.cluster = true;
    dataset.layers.push(layer);

    let render = || {
        let mut config = AppConfig::default();
        config.render_mut().set_seed(seed);
        let builder = DiagramBuilder::new(config);
        builder
            .build(&dataset)
            .map(|spec| builder.render_dot(&spec))
            .map_err(|err| TestCaseError::fail(err.to_string()))
    };

    prop_assert_eq!(render()?, render()?);
    Ok(())
}

// ===================
// Proptest Wrappers
// ===================

proptest! {
    #[test]
    fn tree_node_and_edge_counts(parents in shape_strategy()) {
        check_tree_node_and_edge_counts(parents)?;
    }

    #[test]
    fn repeated_trees_collapse(parents in shape_strategy(), copies in 1usize..4) {
        check_repeated_trees_collapse(parents, copies)?;
    }

    #[test]
    fn template_order(parents in shape_strategy(), fields in fields_strategy()) {
        check_template_order(parents, fields)?;
    }

    #[test]
    fn undeclared_category_fallback(parents in shape_strategy()) {
        check_undeclared_category_fallback(parents)?;
    }

    #[test]
    fn deterministic_output(parents in shape_strategy(), seed in any::<u64>()) {
        check_deterministic_output(parents, seed)?;
    }
}
