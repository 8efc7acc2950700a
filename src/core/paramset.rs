use crate::core::geometry::normal::Normal3f;
use crate::core::geometry::point::Point3f;
use crate::core::geometry::vector::Vector3f;
use crate::core::pbrt::Float;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Canonical parameter kinds. Declared type words are normalized through
/// [`canonical_kind`] before lookup; spectrum and blackbody parameters are
/// converted to rgb by the parameter engine, so handlers only ever see the
/// post-conversion kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Integer,
    Float,
    Bool,
    String,
    Texture,
    Point3,
    Normal3,
    Rgb,
    Spectrum,
    Blackbody,
}

impl Display for ParamKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParamKind::Integer => "integer",
            ParamKind::Float => "float",
            ParamKind::Bool => "bool",
            ParamKind::String => "string",
            ParamKind::Texture => "texture",
            ParamKind::Point3 => "point3",
            ParamKind::Normal3 => "normal3",
            ParamKind::Rgb => "rgb",
            ParamKind::Spectrum => "spectrum",
            ParamKind::Blackbody => "blackbody",
        };
        write!(f, "{}", s)
    }
}

/// Normalize a declared type word to its canonical kind. Returns None for
/// unknown or unsupported type words.
pub fn canonical_kind(word: &str) -> Option<ParamKind> {
    let kind = match word {
        "integer" => ParamKind::Integer,
        "float" => ParamKind::Float,
        "bool" => ParamKind::Bool,
        "string" => ParamKind::String,
        "texture" => ParamKind::Texture,
        "point" | "point3" => ParamKind::Point3,
        "normal" | "normal3" => ParamKind::Normal3,
        "color" | "rgb" => ParamKind::Rgb,
        "spectrum" => ParamKind::Spectrum,
        "blackbody" => ParamKind::Blackbody,
        _ => return None,
    };

    Some(kind)
}

/// A parameter's values, one case per canonical kind's underlying scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Ints(Vec<i32>),
    Floats(Vec<Float>),
    Bools(Vec<bool>),
    Strings(Vec<String>),
    Texture(String),
    Points(Vec<Point3f>),
    Normals(Vec<Normal3f>),
    Rgbs(Vec<Vector3f>),
}

#[derive(Debug, Clone)]
pub struct Param {
    pub kind: ParamKind,
    pub name: String,
    pub value: ParamValue,
}

/// The parameters of one directive, in declaration order. Handlers iterate
/// or look up by name; lookups that want a single scalar take the first
/// value, matching how the directive interpreters consume them.
#[derive(Debug, Default, Clone)]
pub struct ParamSet {
    params: Vec<Param>,
}

impl ParamSet {
    pub fn push(&mut self, param: Param) {
        self.params.push(param);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn find_one_float(&self, name: &str, d: Float) -> Float {
        match self.find(name).map(|p| &p.value) {
            Some(ParamValue::Floats(v)) if !v.is_empty() => v[0],
            _ => d,
        }
    }

    pub fn find_one_int(&self, name: &str, d: i32) -> i32 {
        match self.find(name).map(|p| &p.value) {
            Some(ParamValue::Ints(v)) if !v.is_empty() => v[0],
            _ => d,
        }
    }

    pub fn find_one_bool(&self, name: &str, d: bool) -> bool {
        match self.find(name).map(|p| &p.value) {
            Some(ParamValue::Bools(v)) if !v.is_empty() => v[0],
            _ => d,
        }
    }

    pub fn find_one_string(&self, name: &str) -> Option<&str> {
        match self.find(name).map(|p| &p.value) {
            Some(ParamValue::Strings(v)) if !v.is_empty() => Some(&v[0]),
            _ => None,
        }
    }

    pub fn find_texture(&self, name: &str) -> Option<&str> {
        match self.find(name).map(|p| &p.value) {
            Some(ParamValue::Texture(t)) => Some(t),
            _ => None,
        }
    }

    pub fn find_one_rgb(&self, name: &str, d: Vector3f) -> Vector3f {
        match self.find(name).map(|p| &p.value) {
            Some(ParamValue::Rgbs(v)) if !v.is_empty() => v[0],
            _ => d,
        }
    }

    pub fn find_one_point3(&self, name: &str, d: Point3f) -> Point3f {
        match self.find(name).map(|p| &p.value) {
            Some(ParamValue::Points(v)) if !v.is_empty() => v[0],
            _ => d,
        }
    }
}

lazy_static! {
    /// Fixed registry of parameter names to the declared kinds accepted for
    /// them. A declared kind outside a name's set is a syntax error; names
    /// missing from the registry are unknown parameters, parsed by their
    /// declared kind and ignored by the handlers with a warning.
    static ref PARAM_REGISTRY: HashMap<&'static str, &'static [ParamKind]> = {
        use ParamKind::*;

        const REFLECTANCE: &[ParamKind] = &[Rgb, Spectrum, Blackbody, Texture];
        const RADIANCE: &[ParamKind] = &[Rgb, Spectrum, Blackbody];
        const TEX_OR_VALUE: &[ParamKind] = &[Float, Rgb, Spectrum, Texture];
        const FLOAT_ONLY: &[ParamKind] = &[Float];
        const INT_ONLY: &[ParamKind] = &[Integer];
        const STRING_ONLY: &[ParamKind] = &[String];
        const TEXTURE_ONLY: &[ParamKind] = &[Texture];

        let mut m: HashMap<&'static str, &'static [ParamKind]> = HashMap::new();

        // camera / film
        m.insert("frameaspectratio", FLOAT_ONLY);
        m.insert("fov", FLOAT_ONLY);
        m.insert("lensradius", FLOAT_ONLY);
        m.insert("focaldistance", FLOAT_ONLY);
        m.insert("xresolution", INT_ONLY);
        m.insert("yresolution", INT_ONLY);

        // shapes
        m.insert("indices", INT_ONLY);
        m.insert("P", &[Point3]);
        m.insert("N", &[Normal3]);
        m.insert("uv", FLOAT_ONLY);
        m.insert("st", FLOAT_ONLY);
        m.insert("filename", STRING_ONLY);
        m.insert("p", &[Point3]);
        m.insert("degree", INT_ONLY);
        m.insert("splitdepth", INT_ONLY);
        m.insert("width", FLOAT_ONLY);

        // materials
        m.insert("type", STRING_ONLY);
        m.insert("Kd", REFLECTANCE);
        m.insert("Ks", REFLECTANCE);
        m.insert("Kr", REFLECTANCE);
        m.insert("Kt", REFLECTANCE);
        m.insert("reflect", REFLECTANCE);
        m.insert("transmit", REFLECTANCE);
        m.insert("eta", REFLECTANCE);
        m.insert("k", REFLECTANCE);
        m.insert("roughness", &[Float, Texture]);
        m.insert("amount", &[Float, Rgb]);
        m.insert("namedmaterial1", STRING_ONLY);
        m.insert("namedmaterial2", STRING_ONLY);
        m.insert("bumpmap", TEXTURE_ONLY);
        m.insert("bump", TEXTURE_ONLY);

        // lights
        m.insert("L", RADIANCE);
        m.insert("I", RADIANCE);
        m.insert("scale", RADIANCE);
        m.insert("from", &[Point3]);
        m.insert("twosided", &[Bool]);
        m.insert("mapname", STRING_ONLY);

        // textures
        m.insert("value", TEX_OR_VALUE);
        m.insert("tex1", TEX_OR_VALUE);
        m.insert("tex2", TEX_OR_VALUE);
        m.insert("uscale", FLOAT_ONLY);
        m.insert("vscale", FLOAT_ONLY);

        m
    };
}

/// Look up the kinds accepted for a parameter name. None means the name is
/// not registered and any declared kind is accepted.
pub fn registered_kinds(name: &str) -> Option<&'static [ParamKind]> {
    PARAM_REGISTRY.get(name).copied()
}
