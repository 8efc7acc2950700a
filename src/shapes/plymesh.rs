use crate::core::geometry::normal::Normal3f;
use crate::core::geometry::point::{Point2f, Point3f};
use crate::core::shape::Shape;
use anyhow::{bail, Context, Result};
use log::info;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Loader for the polygonal-mesh files referenced by "plymesh" shapes.
/// Handles the subset of PLY the scene corpus uses: "vertex" elements with
/// float properties x y z (required), nx ny nz and u v (optional), and
/// "face" elements carrying uint8-counted int index lists of triangles.
/// The body is either ASCII or little-endian binary, selected by the
/// "format" header line.

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum VertexProp {
    X,
    Y,
    Z,
    Nx,
    Ny,
    Nz,
    U,
    V,
}

impl VertexProp {
    fn from_name(name: &str) -> Option<Self> {
        let prop = match name {
            "x" => VertexProp::X,
            "y" => VertexProp::Y,
            "z" => VertexProp::Z,
            "nx" => VertexProp::Nx,
            "ny" => VertexProp::Ny,
            "nz" => VertexProp::Nz,
            "u" => VertexProp::U,
            "v" => VertexProp::V,
            _ => return None,
        };

        Some(prop)
    }
}

struct Header {
    ascii: bool,
    n_vertices: usize,
    n_faces: usize,
    vertex_props: Vec<VertexProp>,
}

/// Parse a PLY file and fill the shape's vertex and face buffers.
pub fn load_plymesh<P: AsRef<Path>>(filename: P, shp: &mut Shape) -> Result<()> {
    let filename = filename.as_ref();
    let f = File::open(filename)
        .with_context(|| format!("Failed to open PLY file \"{}\"", filename.display()))?;
    let mut reader = BufReader::new(f);

    let header = read_header(&mut reader)?;

    info!(
        "Loading PLY file \"{}\" with {} vertices and {} faces",
        filename.display(),
        header.n_vertices,
        header.n_faces
    );

    let has_normals = header.vertex_props.contains(&VertexProp::Nx);
    let has_texcoord = header.vertex_props.contains(&VertexProp::U);

    if !header.vertex_props.contains(&VertexProp::X) {
        bail!("no vertex positions");
    }

    if header.ascii {
        read_ascii_body(&mut reader, &header, shp)?;
    } else {
        read_binary_body(&mut reader, &header, shp)?;
    }

    if has_normals && shp.norm.len() != shp.pos.len() {
        bail!("normal count does not match vertex count");
    }

    if has_texcoord && shp.texcoord.len() != shp.pos.len() {
        bail!("texcoord count does not match vertex count");
    }

    Ok(())
}

fn read_header<R: BufRead>(reader: &mut R) -> Result<Header> {
    let mut header = Header {
        ascii: false,
        n_vertices: 0,
        n_faces: 0,
        vertex_props: Vec::new(),
    };

    #[derive(PartialEq)]
    enum Element {
        None,
        Vertex,
        Face,
    }

    let mut current = Element::None;
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            bail!("unexpected end of file inside header");
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.first().copied() {
            Some("end_header") => break,
            Some("format") => {
                header.ascii = tokens.get(1) == Some(&"ascii");
            }
            Some("element") => match tokens.get(1).copied() {
                Some("vertex") => {
                    header.n_vertices = parse_count(&tokens)?;
                    current = Element::Vertex;
                }
                Some("face") => {
                    header.n_faces = parse_count(&tokens)?;
                    current = Element::Face;
                }
                Some(other) => bail!("element \"{}\" not known", other),
                None => bail!("element line without a name"),
            },
            Some("property") if current == Element::Face => {
                // face index list: uint8/uchar count, int elements
                if tokens.get(1) != Some(&"list") {
                    bail!("expected an index list property for the face element");
                }

                let size_kind = tokens.get(2).copied().unwrap_or("");
                if size_kind != "uint8" && size_kind != "uchar" {
                    bail!(
                        "expected type uint8 or uchar for the index list size, got \"{}\"",
                        size_kind
                    );
                }

                if tokens.get(3) != Some(&"int") {
                    bail!("expected type int for vertex indices");
                }

                if tokens.get(4) != Some(&"vertex_indices") {
                    bail!(
                        "expected a vertex_indices property, got \"{}\"",
                        tokens.get(4).copied().unwrap_or("")
                    );
                }
            }
            Some("property") if current == Element::Vertex => {
                if tokens.get(1) != Some(&"float") {
                    bail!(
                        "unexpected type \"{}\" for vertex property",
                        tokens.get(1).copied().unwrap_or("")
                    );
                }

                let name = tokens.get(2).copied().unwrap_or("");
                match VertexProp::from_name(name) {
                    Some(p) => header.vertex_props.push(p),
                    None => bail!("\"{}\" is not a recognized vertex property", name),
                }
            }
            Some("property") => bail!("property declared before any element"),
            // "ply", "comment" and anything else before end_header
            _ => {}
        }
    }

    Ok(header)
}

fn parse_count(tokens: &[&str]) -> Result<usize> {
    tokens
        .get(2)
        .and_then(|t| t.parse::<usize>().ok())
        .context("malformed element count")
}

fn store_vertex(
    shp: &mut Shape,
    props: &[VertexProp],
    values: &[f32],
) {
    let mut pos = Point3f::default();
    let mut norm = Normal3f::default();
    let mut uv = Point2f::default();
    let mut has_norm = false;
    let mut has_uv = false;

    for (prop, v) in props.iter().zip(values) {
        match prop {
            VertexProp::X => pos.x = *v,
            VertexProp::Y => pos.y = *v,
            VertexProp::Z => pos.z = *v,
            VertexProp::Nx => {
                has_norm = true;
                norm.x = *v;
            }
            VertexProp::Ny => norm.y = *v,
            VertexProp::Nz => norm.z = *v,
            VertexProp::U => {
                has_uv = true;
                uv.x = *v;
            }
            VertexProp::V => uv.y = *v,
        }
    }

    shp.pos.push(pos);
    if has_norm {
        shp.norm.push(norm);
    }
    if has_uv {
        shp.texcoord.push(uv);
    }
}

fn read_ascii_body<R: BufRead>(reader: &mut R, header: &Header, shp: &mut Shape) -> Result<()> {
    let mut line = String::new();

    let mut values = Vec::with_capacity(header.vertex_props.len());
    for _ in 0..header.n_vertices {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            bail!("unexpected end of file in vertex list");
        }

        values.clear();
        for token in line.split_whitespace() {
            values.push(
                token
                    .parse::<f32>()
                    .with_context(|| format!("malformed vertex value \"{}\"", token))?,
            );
        }

        if values.len() != header.vertex_props.len() {
            bail!("wrong number of values for vertex");
        }

        store_vertex(shp, &header.vertex_props, &values);
    }

    for _ in 0..header.n_faces {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            bail!("unexpected end of file in face list");
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.first() != Some(&"3") {
            bail!(
                "there must be exactly three vertices per face, got {}",
                tokens.first().copied().unwrap_or("none")
            );
        }

        if tokens.len() < 4 {
            bail!("truncated face line");
        }

        let mut tri = [0u32; 3];
        for (t, token) in tri.iter_mut().zip(&tokens[1..4]) {
            *t = token
                .parse::<i32>()
                .with_context(|| format!("malformed face index \"{}\"", token))?
                as u32;
        }

        shp.triangles.push(tri);
    }

    Ok(())
}

fn read_binary_body<R: Read>(reader: &mut R, header: &Header, shp: &mut Shape) -> Result<()> {
    let mut values = Vec::with_capacity(header.vertex_props.len());
    for _ in 0..header.n_vertices {
        values.clear();
        for _ in 0..header.vertex_props.len() {
            values.push(read_f32(reader)?);
        }

        store_vertex(shp, &header.vertex_props, &values);
    }

    for _ in 0..header.n_faces {
        let mut count = [0u8; 1];
        reader
            .read_exact(&mut count)
            .context("unexpected end of file in face list")?;

        if count[0] != 3 {
            bail!(
                "there must be exactly three vertices per face, got {}",
                count[0]
            );
        }

        let tri = [
            read_i32(reader)? as u32,
            read_i32(reader)? as u32,
            read_i32(reader)? as u32,
        ];
        shp.triangles.push(tri);
    }

    Ok(())
}

fn read_f32<R: Read>(reader: &mut R) -> Result<f32> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .context("unexpected end of file in vertex list")?;
    Ok(f32::from_le_bytes(buf))
}

fn read_i32<R: Read>(reader: &mut R) -> Result<i32> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .context("unexpected end of file in face list")?;
    Ok(i32::from_le_bytes(buf))
}
