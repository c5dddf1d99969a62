use super::distribution::UNKNOWN_LABEL;
use crate::apex;
use crate::storage::models::SunburstRow;
use serde::Serialize;

/// One ring segment of a sunburst chart. Only leaves carry a size; inner
/// nodes are sized by their children.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SunburstNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SunburstNode>,
}

impl SunburstNode {
    pub const ROOT_NAME: &'static str = "root";

    fn branch(name: String) -> Self {
        SunburstNode {
            name,
            size: None,
            children: Vec::new(),
        }
    }

    fn child(&mut self, name: String) -> &mut SunburstNode {
        let index = match self.children.iter().position(|c| c.name == name) {
            Some(i) => i,
            None => {
                self.children.push(SunburstNode::branch(name));
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }

    /// Folds grouped rows into a camera → lens → f-number → focal length
    /// hierarchy. Children keep the order rows first mention them in; rows
    /// landing on the same leaf add up.
    pub fn from_rows(rows: Vec<SunburstRow>) -> Self {
        let mut root = SunburstNode::branch(Self::ROOT_NAME.to_string());
        for row in rows {
            let aperture = row
                .aperture
                .map(apex::format_f_number)
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
            let focal_length = row
                .focal_length
                .map(|v| v.to_string())
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string());

            let leaf = root
                .child(row.camera)
                .child(row.lens)
                .child(aperture)
                .child(focal_length);
            *leaf.size.get_or_insert(0) += row.count;
        }
        root
    }

    /// Sum of all leaf sizes below this node.
    pub fn total(&self) -> i64 {
        self.size.unwrap_or(0) + self.children.iter().map(SunburstNode::total).sum::<i64>()
    }

    pub fn find(&self, name: &str) -> Option<&SunburstNode> {
        self.children.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(camera: &str, lens: &str, aperture: Option<f64>, focal: Option<f64>, count: i64) -> SunburstRow {
        SunburstRow {
            camera: camera.to_string(),
            lens: lens.to_string(),
            aperture,
            focal_length: focal,
            count,
        }
    }

    #[test]
    fn test_builds_four_levels() {
        let tree = SunburstNode::from_rows(vec![
            row("X100V", "23mm F2", Some(2.0), Some(23.0), 10),
            row("X100V", "23mm F2", Some(4.0), Some(23.0), 5),
            row("EOS R5", "RF 50mm", Some(2.0), Some(50.0), 3),
        ]);

        assert_eq!(tree.name, "root");
        assert_eq!(tree.children.len(), 2);
        let lens = tree.find("X100V").unwrap().find("23mm F2").unwrap();
        assert_eq!(lens.children.len(), 2);
        let leaf = lens.find("2.0").unwrap().find("23").unwrap();
        assert_eq!(leaf.size, Some(10));
        assert!(lens.size.is_none());
        assert_eq!(tree.total(), 18);
    }

    #[test]
    fn test_missing_exif_goes_to_unknown() {
        let tree = SunburstNode::from_rows(vec![
            row("X100V", "23mm F2", None, None, 2),
            row("X100V", "23mm F2", None, None, 1),
        ]);
        let leaf = tree
            .find("X100V")
            .and_then(|n| n.find("23mm F2"))
            .and_then(|n| n.find(UNKNOWN_LABEL))
            .and_then(|n| n.find(UNKNOWN_LABEL))
            .unwrap();
        assert_eq!(leaf.size, Some(3));
    }

    #[test]
    fn test_serializes_without_empty_fields() {
        let tree = SunburstNode::from_rows(vec![row("A", "B", Some(2.0), Some(35.0), 1)]);
        let json = serde_json::to_value(&tree).unwrap();
        assert!(json.get("size").is_none());
        let leaf = &json["children"][0]["children"][0]["children"][0]["children"][0];
        assert_eq!(leaf["name"], "35");
        assert_eq!(leaf["size"], 1);
        assert!(leaf.get("children").is_none());
    }
}
