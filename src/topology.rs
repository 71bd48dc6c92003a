use crate::diagram::{Diagram, DiagramAttrs, DiagramError, Direction, NodeKind, OutFormat};

pub const TITLE: &str = "VPC with 1 public subnet for the TFE server \nservices subnet for PostgreSQL";
pub const FILENAME: &str = "diagram_tfe_fdo_gcp_mounted_disk";
pub const OUTFORMAT: OutFormat = OutFormat::Png;
pub const DIRECTION: Direction = Direction::TB;

pub fn default_attrs() -> DiagramAttrs {
    DiagramAttrs {
        title: TITLE.to_string(),
        filename: Some(FILENAME.to_string()),
        direction: DIRECTION,
        outformats: vec![OUTFORMAT],
    }
}

/// TFE on GCP: a public subnet for the server, a services subnet for
/// PostgreSQL and a file-store bucket, all inside one VPC.
pub fn tfe_gcp(attrs: DiagramAttrs) -> Result<Diagram, DiagramError> {
    let mut diagram = Diagram::new(attrs);

    let user = diagram.add_node("user", NodeKind::Server, None)?;

    let gcp = diagram.add_cluster("gcp", None)?;
    let vpc = diagram.add_cluster("vpc", Some(gcp))?;
    let public = diagram.add_cluster("subnet_public1", Some(vpc))?;
    let tfe_server = diagram.add_node("TFE_server", NodeKind::ComputeEngine, Some(public))?;
    let services = diagram.add_cluster("subnet_services", Some(vpc))?;
    let postgresql = diagram.add_node("PostgreSQL database", NodeKind::Sql, Some(services))?;
    let bucket = diagram.add_node("TFE bucket", NodeKind::Filestore, Some(gcp))?;

    diagram.connect(user, tfe_server)?;
    diagram.fan_out(tfe_server, &[postgresql, bucket])?;

    Ok(diagram)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge_labels(diagram: &Diagram) -> Vec<(String, String)> {
        diagram.descriptor().edges
    }

    #[test]
    fn test_declares_one_node_per_kind() {
        let diagram = tfe_gcp(default_attrs()).unwrap();
        let kinds: Vec<NodeKind> = diagram.nodes().iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Server,
                NodeKind::ComputeEngine,
                NodeKind::Sql,
                NodeKind::Filestore
            ]
        );
    }

    #[test]
    fn test_edges_leave_compute_instance() {
        let diagram = tfe_gcp(default_attrs()).unwrap();
        let pair = |a: &str, b: &str| (a.to_string(), b.to_string());
        assert_eq!(
            edge_labels(&diagram),
            vec![
                pair("user", "TFE_server"),
                pair("TFE_server", "PostgreSQL database"),
                pair("TFE_server", "TFE bucket"),
            ]
        );
    }

    #[test]
    fn test_cluster_layout() {
        let diagram = tfe_gcp(default_attrs()).unwrap();
        let descriptor = diagram.descriptor();

        let path_of = |label: &str| {
            descriptor
                .nodes
                .iter()
                .find(|n| n.label == label)
                .map(|n| n.path.join("/"))
                .unwrap()
        };
        assert_eq!(path_of("user"), "");
        assert_eq!(path_of("TFE_server"), "gcp/vpc/subnet_public1");
        assert_eq!(path_of("PostgreSQL database"), "gcp/vpc/subnet_services");
        assert_eq!(path_of("TFE bucket"), "gcp");
    }

    #[test]
    fn test_declaration_is_idempotent() {
        let first = tfe_gcp(default_attrs()).unwrap();
        let second = tfe_gcp(default_attrs()).unwrap();
        assert_eq!(first.descriptor(), second.descriptor());
    }

    #[test]
    fn test_default_attrs() {
        let attrs = default_attrs();
        assert_eq!(attrs.file_stem(), "diagram_tfe_fdo_gcp_mounted_disk");
        assert_eq!(attrs.direction, Direction::TB);
        assert_eq!(attrs.outformats, vec![OutFormat::Png]);
    }
}
