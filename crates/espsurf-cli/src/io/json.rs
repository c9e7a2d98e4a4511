use crate::error::Result;
use espsurf::core::models::mesh::Mesh;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// The surface document: flat `[x0, y0, z0, x1, ...]` vertices and `[a0, b0, c0, ...]`
/// triangle indices.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SurfaceRecord {
    pub vertices: Vec<f64>,
    pub indices: Vec<u32>,
}

impl From<&Mesh> for SurfaceRecord {
    fn from(mesh: &Mesh) -> Self {
        Self {
            vertices: mesh.flat_vertices(),
            indices: mesh.flat_indices(),
        }
    }
}

pub fn write_surface(path: &Path, record: &SurfaceRecord, pretty: bool) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, record).map_err(std::io::Error::from)?;
    } else {
        serde_json::to_writer(&mut writer, record).map_err(std::io::Error::from)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use tempfile::tempdir;

    fn triangle() -> Mesh {
        Mesh::new(
            vec![
                Point3::new(0.5, 0.0, 0.0),
                Point3::new(0.0, 0.5, 0.0),
                Point3::new(0.0, 0.0, 0.5),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap()
    }

    #[test]
    fn record_flattens_the_mesh() {
        let record = SurfaceRecord::from(&triangle());
        assert_eq!(
            record.vertices,
            vec![0.5, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.5]
        );
        assert_eq!(record.indices, vec![0, 1, 2]);
    }

    #[test]
    fn written_document_has_the_expected_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("surface.json");
        write_surface(&path, &SurfaceRecord::from(&triangle()), false).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["vertices"].as_array().unwrap().len(), 9);
        assert_eq!(value["indices"], serde_json::json!([0, 1, 2]));
    }

    #[test]
    fn pretty_output_parses_to_the_same_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("surface.json");
        let record = SurfaceRecord::from(&triangle());
        write_surface(&path, &record, true).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains('\n'));
        let parsed: SurfaceRecord = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn empty_mesh_writes_empty_arrays() {
        let record = SurfaceRecord::from(&Mesh::empty());
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"vertices":[],"indices":[]}"#
        );
    }
}
