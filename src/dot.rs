use crate::diagram::{Cluster, Diagram, Node};
use std::fmt::Write;

const CLUSTER_BG_COLORS: [&str; 4] = ["#E5F5FD", "#EBF3E7", "#ECE8F6", "#FDF7E3"];

fn escape_dot(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

fn node_id(node: &Node) -> String {
    format!("n{}", node.id.index())
}

pub fn to_dot(diagram: &Diagram) -> String {
    let attrs = diagram.attrs();
    let mut out = String::from("digraph diagram {\n");

    let _ = writeln!(out, "  label=\"{}\";", escape_dot(&attrs.title));
    out.push_str("  labelloc=t;\n");
    let _ = writeln!(out, "  rankdir={};", attrs.direction);
    out.push_str("  pad=\"2.0\";\n");
    out.push_str("  splines=ortho;\n");
    out.push_str("  nodesep=\"0.60\";\n");
    out.push_str("  ranksep=\"0.75\";\n");
    out.push_str("  fontname=\"Sans-Serif\";\n");
    out.push_str("  fontsize=15;\n");
    out.push_str("  fontcolor=\"#2D3436\";\n");
    out.push_str("  compound=true;\n");
    out.push_str(
        "  node [shape=box, style=\"rounded,filled\", fixedsize=true, width=1.4, height=1.4, \
         labelloc=b, fontname=\"Sans-Serif\", fontsize=13, fontcolor=\"#2D3436\"];\n",
    );
    out.push_str("  edge [color=\"#7B8894\"];\n");

    for node in diagram.root_nodes() {
        write_node(&mut out, node, 1);
    }
    for cluster in diagram.children_of(None) {
        write_cluster(&mut out, diagram, cluster, 1);
    }

    for edge in diagram.edges() {
        let _ = writeln!(out, "  n{} -> n{};", edge.from.index(), edge.to.index());
    }

    out.push_str("}\n");
    out
}

fn write_node(out: &mut String, node: &Node, level: usize) {
    indent(out, level);
    let _ = writeln!(
        out,
        "{} [label=\"{}\", shape={}, fillcolor=\"{}\"];",
        node_id(node),
        escape_dot(&node.label),
        node.kind.shape(),
        node.kind.fill_color()
    );
}

fn write_cluster(out: &mut String, diagram: &Diagram, cluster: &Cluster, level: usize) {
    let depth = diagram.depth(cluster.id);

    indent(out, level);
    let _ = writeln!(out, "subgraph cluster_{} {{", cluster.id.index());
    indent(out, level + 1);
    let _ = writeln!(out, "label=\"{}\";", escape_dot(&cluster.label));
    indent(out, level + 1);
    out.push_str("labeljust=l;\n");
    indent(out, level + 1);
    out.push_str("style=rounded;\n");
    indent(out, level + 1);
    out.push_str("pencolor=\"#AEB6BE\";\n");
    indent(out, level + 1);
    out.push_str("fontname=\"Sans-Serif\";\n");
    indent(out, level + 1);
    out.push_str("fontsize=12;\n");
    indent(out, level + 1);
    let _ = writeln!(
        out,
        "bgcolor=\"{}\";",
        CLUSTER_BG_COLORS[depth % CLUSTER_BG_COLORS.len()]
    );

    for node in diagram.nodes_in(Some(cluster.id)) {
        write_node(out, node, level + 1);
    }
    for child in diagram.children_of(Some(cluster.id)) {
        write_cluster(out, diagram, child, level + 1);
    }

    indent(out, level);
    out.push_str("}\n");
}
