use crate::core::error::{PbrtError, Result};
use crate::core::fileutil::{concatenate_paths, has_extension, standardize_path_separator};
use crate::core::floatfile::read_float_file;
use crate::core::geometry::normal::Normal3f;
use crate::core::geometry::point::Point3f;
use crate::core::geometry::vector::Vector3f;
use crate::core::imageio::{load_image4b, load_image4f};
use crate::core::material::Material;
use crate::core::camera::Camera;
use crate::core::light::Environment;
use crate::core::paramset::{
    canonical_kind, registered_kinds, Param, ParamKind, ParamSet, ParamValue,
};
use crate::core::pbrt::{radians, Float};
use crate::core::scene::{CounterId, Instance, Scene};
use crate::core::shape::{Shape, ShapeGroup};
use crate::core::spectrum::{blackbody_to_rgb, spectrum_to_rgb};
use crate::core::texture::Texture;
use crate::core::transform;
use crate::materials::glass::create_glass_material;
use crate::materials::matte::create_matte_material;
use crate::materials::metal::create_metal_material;
use crate::materials::mirror::create_mirror_material;
use crate::materials::mix::{amount_from_rgb, create_mix_material};
use crate::materials::plastic::create_plastic_material;
use crate::materials::translucent::create_translucent_material;
use crate::materials::uber::create_uber_material;
use crate::materials::{ColorProp, MaterialProps, ScalarProp};
use crate::pbrtparser::lexer::{Lexeme, LexemeType, Lexer, LexerStack};
use crate::pbrtparser::state::{
    AreaLightInfo, DeclaredMaterial, DeclaredObject, DeclaredTexture, GraphicsState,
};
use crate::shapes::cube::make_cube;
use crate::shapes::plymesh::load_plymesh;
use crate::shapes::trianglemesh::fill_trianglemesh;
use crate::textures::checkerboard::create_checkerboard_texture;
use crate::textures::constant::create_constant_texture;
use crate::textures::imagemap::create_imagemap_texture;
use crate::textures::scaled::{create_scale_texture, ScaleInput};
use crate::core::scene::IdGenerator;
use log::{info, warn};
use nalgebra::Matrix4;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

const MATERIAL_SUBTYPES: &[&str] = &[
    "matte",
    "metal",
    "mix",
    "plastic",
    "mirror",
    "uber",
    "translucent",
    "glass",
];

/// Parse the scene description at `filename` into a scene graph.
pub fn parse_scene<P: AsRef<Path>>(filename: P) -> Result<Scene> {
    PBRTParser::new(filename)?.parse()
}

/// Raw parameter values of either literal family, before kind dispatch.
enum ArrayVals {
    Str(Vec<String>),
    Num(Vec<Float>),
}

/// Recursive-descent interpreter for the PBRT v3 scene format. Owns the
/// lexer stack, the graphics-state and transform stacks, the declared
/// resource tables and the output scene; a single error aborts the parse.
pub struct PBRTParser {
    lexers: LexerStack,
    current: Lexeme,
    gstate: GraphicsState,
    state_stack: Vec<GraphicsState>,
    ctm_stack: Vec<Matrix4<Float>>,
    objects: HashMap<String, DeclaredObject>,
    /// in-flight object template; object blocks are not nestable
    in_object: Option<ShapeGroup>,
    scene: Scene,
    ids: IdGenerator,
    /// aspect ratio either of Film resolution or Camera frameaspectratio
    default_aspect: Float,
    /// focus distance captured by the most recent LookAt
    default_focus: Float,
}

impl PBRTParser {
    pub fn new<P: AsRef<Path>>(filename: P) -> Result<Self> {
        Ok(Self::with_lexer(Lexer::from_file(filename)?))
    }

    /// Parser over in-memory text; relative asset paths resolve against
    /// `path`.
    pub fn from_source(text: &str, path: &str) -> Self {
        Self::with_lexer(Lexer::from_source(text, path, "<source>"))
    }

    fn with_lexer(lexer: Lexer) -> Self {
        Self {
            lexers: LexerStack::new(lexer),
            current: Lexeme {
                kind: LexemeType::Identifier,
                value: String::new(),
            },
            gstate: GraphicsState::default(),
            state_stack: Vec::new(),
            ctm_stack: Vec::new(),
            objects: HashMap::new(),
            in_object: None,
            scene: Scene::default(),
            ids: IdGenerator::default(),
            default_aspect: 16.0 / 9.0,
            default_focus: 1.0,
        }
    }

    /// Run the parse to completion and hand out the scene.
    pub fn parse(mut self) -> Result<Scene> {
        match self.run() {
            Ok(()) => Ok(self.scene),
            Err(PbrtError::InputEnded) => {
                Err(self.syntax_error("input ended before the scene description was complete"))
            }
            Err(e) => Err(e),
        }
    }

    fn run(&mut self) -> Result<()> {
        self.advance()?;
        self.parse_preworld_directives()?;
        self.parse_world_directives()
    }

    // ------------------------------------------------------------------
    // token plumbing
    // ------------------------------------------------------------------

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexers.next_lexeme()?;
        Ok(())
    }

    fn syntax_error(&self, msg: &str) -> PbrtError {
        let (file, line, column) = self.lexers.position();
        PbrtError::Syntax {
            file,
            line,
            column,
            msg: msg.to_owned(),
        }
    }

    fn expect_string(&mut self, what: &str) -> Result<String> {
        if self.current.kind != LexemeType::String {
            return Err(self.syntax_error(&format!("Expected {}.", what)));
        }

        let s = std::mem::take(&mut self.current.value);
        self.advance()?;
        Ok(s)
    }

    fn parse_directive_float(&mut self, directive: &str, param: &str) -> Result<Float> {
        if self.current.kind != LexemeType::Number {
            return Err(self.syntax_error(&format!(
                "Expected a float value for '{}' parameter of {} directive.",
                param, directive
            )));
        }

        let v = self
            .current
            .value
            .parse::<Float>()
            .map_err(|_| self.syntax_error("malformed numeric literal"))?;
        self.advance()?;
        Ok(v)
    }

    fn number_value(&self) -> Result<Float> {
        self.current
            .value
            .parse::<Float>()
            .map_err(|_| self.syntax_error("malformed numeric literal"))
    }

    /// Skip tokens until the next directive identifier.
    fn skip_to_next_directive(&mut self) -> Result<()> {
        while self.current.kind != LexemeType::Identifier {
            self.advance()?;
        }
        Ok(())
    }

    /// Skip an entire unknown directive, its name included.
    fn ignore_current_directive(&mut self) -> Result<()> {
        self.advance()?;
        self.skip_to_next_directive()
    }

    // ------------------------------------------------------------------
    // directive dispatch
    // ------------------------------------------------------------------

    /// Scene-wide rendering options, until the WorldBegin marker.
    fn parse_preworld_directives(&mut self) -> Result<()> {
        while !self.current.is_identifier("WorldBegin") {
            if self.current.kind != LexemeType::Identifier {
                return Err(self.syntax_error(&format!(
                    "Identifier expected, got \"{}\" instead.",
                    self.current.value
                )));
            }

            match self.current.value.as_str() {
                "Camera" => self.execute_camera()?,
                "Film" => self.execute_film()?,
                "Include" => self.execute_include()?,
                "Translate" => self.execute_translate()?,
                "Scale" => self.execute_scale()?,
                "Rotate" => self.execute_rotate()?,
                "LookAt" => self.execute_lookat()?,
                "Transform" => self.execute_transform()?,
                "ConcatTransform" => self.execute_concat_transform()?,
                other => {
                    let (_, line, _) = self.lexers.position();
                    warn!("(Line {}) Ignoring {} directive", line, other);
                    self.ignore_current_directive()?;
                }
            }
        }

        Ok(())
    }

    /// Scene contents, until the WorldEnd marker. The transformation
    /// accumulated before WorldBegin carries over.
    fn parse_world_directives(&mut self) -> Result<()> {
        self.advance()?;

        while !self.current.is_identifier("WorldEnd") {
            self.execute_world_directive()?;
        }

        Ok(())
    }

    fn execute_world_directive(&mut self) -> Result<()> {
        if self.current.kind != LexemeType::Identifier {
            return Err(self.syntax_error(&format!(
                "Identifier expected, got \"{}\" instead.",
                self.current.value
            )));
        }

        match self.current.value.as_str() {
            "Include" => self.execute_include(),
            "Translate" => self.execute_translate(),
            "Scale" => self.execute_scale(),
            "Rotate" => self.execute_rotate(),
            "LookAt" => self.execute_lookat(),
            "Transform" => self.execute_transform(),
            "ConcatTransform" => self.execute_concat_transform(),
            "AttributeBegin" => self.execute_attribute_begin(),
            "AttributeEnd" => self.execute_attribute_end(),
            "TransformBegin" => self.execute_transform_begin(),
            "TransformEnd" => self.execute_transform_end(),
            "Shape" => self.execute_shape(),
            "ObjectBegin" => self.execute_object_block(),
            "ObjectInstance" => self.execute_object_instance(),
            "LightSource" => self.execute_light_source(),
            "AreaLightSource" => self.execute_area_light_source(),
            "Material" => self.execute_material(),
            "MakeNamedMaterial" => self.execute_make_named_material(),
            "NamedMaterial" => self.execute_named_material(),
            "Texture" => self.execute_texture(),
            other => {
                let (_, line, _) = self.lexers.position();
                warn!("(Line {}) Ignoring {} directive", line, other);
                self.ignore_current_directive()
            }
        }
    }

    // ------------------------------------------------------------------
    // value parsing
    // ------------------------------------------------------------------

    fn parse_value_floats(&mut self) -> Result<Vec<Float>> {
        let mut vals = Vec::new();
        let is_array = self.current.kind == LexemeType::Singleton && self.current.value == "[";

        if is_array {
            self.advance()?;
        }

        while self.current.kind == LexemeType::Number {
            vals.push(self.number_value()?);
            self.advance()?;
            if !is_array {
                break;
            }
        }

        if is_array {
            if self.current.kind == LexemeType::Singleton && self.current.value == "]" {
                self.advance()?;
            } else {
                return Err(self.syntax_error("Expected closing ']'."));
            }
        }

        if vals.is_empty() {
            return Err(self.syntax_error("The array parsed is empty."));
        }

        Ok(vals)
    }

    fn parse_value_ints(&mut self) -> Result<Vec<i32>> {
        // integer literals convert through float, truncating any fraction
        let vals = self.parse_value_floats()?;
        Ok(vals.into_iter().map(|v| v as i32).collect())
    }

    fn parse_value_strings(&mut self) -> Result<Vec<String>> {
        let mut vals = Vec::new();
        let is_array = self.current.kind == LexemeType::Singleton && self.current.value == "[";

        if is_array {
            self.advance()?;
        }

        while self.current.kind == LexemeType::String {
            vals.push(std::mem::take(&mut self.current.value));
            self.advance()?;
            if !is_array {
                break;
            }
        }

        if is_array {
            if self.current.kind == LexemeType::Singleton && self.current.value == "]" {
                self.advance()?;
            } else {
                return Err(self.syntax_error("Expected closing ']'."));
            }
        }

        if vals.is_empty() {
            return Err(self.syntax_error("The array parsed is empty."));
        }

        Ok(vals)
    }

    /// A value of either literal family, decided by the first value token.
    /// Used for spectrum parameters, which take numbers or a file name.
    fn parse_value_mixed(&mut self) -> Result<ArrayVals> {
        if self.current.kind == LexemeType::String {
            return Ok(ArrayVals::Str(self.parse_value_strings()?));
        }

        if self.current.kind == LexemeType::Singleton && self.current.value == "[" {
            self.advance()?;

            let mut strings = Vec::new();
            let mut numbers = Vec::new();

            loop {
                match self.current.kind {
                    LexemeType::String if numbers.is_empty() => {
                        strings.push(std::mem::take(&mut self.current.value));
                        self.advance()?;
                    }
                    LexemeType::Number if strings.is_empty() => {
                        numbers.push(self.number_value()?);
                        self.advance()?;
                    }
                    _ => break,
                }
            }

            if self.current.kind == LexemeType::Singleton && self.current.value == "]" {
                self.advance()?;
            } else {
                return Err(self.syntax_error("Expected closing ']'."));
            }

            return if !strings.is_empty() {
                Ok(ArrayVals::Str(strings))
            } else if !numbers.is_empty() {
                Ok(ArrayVals::Num(numbers))
            } else {
                Err(self.syntax_error("The array parsed is empty."))
            };
        }

        Ok(ArrayVals::Num(self.parse_value_floats()?))
    }

    // ------------------------------------------------------------------
    // parameter engine
    // ------------------------------------------------------------------

    /// Parse one `"<kind> <name>" <value>` parameter declaration, with alias
    /// normalization, registry validation and spectrum/blackbody conversion.
    fn parse_parameter(&mut self) -> Result<Param> {
        if self.current.kind != LexemeType::String {
            return Err(self.syntax_error("Expected a string with type and name of a parameter."));
        }

        let header = std::mem::take(&mut self.current.value);
        let mut words = header.split_whitespace();
        let (kind_word, name) = match (words.next(), words.next()) {
            (Some(k), Some(n)) => (k, n.to_owned()),
            _ => return Err(self.syntax_error("Expected a type and a name for the parameter.")),
        };

        let kind = match canonical_kind(kind_word) {
            Some(kind) => kind,
            None => {
                let msg = if matches!(kind_word, "point2" | "vector2" | "vector3" | "vector" | "xyz")
                {
                    format!("Type '{}' is not supported.", kind_word)
                } else {
                    format!("Unrecognized type '{}'.", kind_word)
                };
                return Err(self.syntax_error(&msg));
            }
        };

        if let Some(allowed) = registered_kinds(&name) {
            if !allowed.contains(&kind) {
                let alternatives = allowed
                    .iter()
                    .map(|k| k.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(self.syntax_error(&format!(
                    "Parameter \"{}\" expects one of: {}.",
                    name, alternatives
                )));
            }
        } else {
            warn!("Unknown parameter \"{}\"", name);
        }

        self.advance()?;

        let (kind, value) = match kind {
            ParamKind::String => {
                let vals = self.parse_value_strings()?;
                if vals.len() > 1 {
                    return Err(self.syntax_error("Expected only one value."));
                }
                (kind, ParamValue::Strings(vals))
            }
            ParamKind::Texture => {
                let mut vals = self.parse_value_strings()?;
                if vals.len() > 1 {
                    return Err(self.syntax_error("Expected only one value."));
                }
                (kind, ParamValue::Texture(vals.remove(0)))
            }
            ParamKind::Bool => {
                let vals = self.parse_value_strings()?;
                if vals.len() > 1 {
                    return Err(self.syntax_error("Expected only one value."));
                }
                let b = match vals[0].as_str() {
                    "true" => true,
                    "false" => false,
                    _ => return Err(self.syntax_error("Invalid value for boolean variable.")),
                };
                (kind, ParamValue::Bools(vec![b]))
            }
            ParamKind::Float => (kind, ParamValue::Floats(self.parse_value_floats()?)),
            ParamKind::Integer => (kind, ParamValue::Ints(self.parse_value_ints()?)),
            ParamKind::Point3 => {
                let vals = self.parse_compound_floats()?;
                let points = vals
                    .chunks(3)
                    .map(|c| Point3f::new(c[0], c[1], c[2]))
                    .collect();
                (kind, ParamValue::Points(points))
            }
            ParamKind::Normal3 => {
                let vals = self.parse_compound_floats()?;
                let normals = vals
                    .chunks(3)
                    .map(|c| Normal3f::new(c[0], c[1], c[2]))
                    .collect();
                (kind, ParamValue::Normals(normals))
            }
            ParamKind::Rgb => {
                let vals = self.parse_compound_floats()?;
                let rgbs = vals
                    .chunks(3)
                    .map(|c| Vector3f::new(c[0], c[1], c[2]))
                    .collect();
                (kind, ParamValue::Rgbs(rgbs))
            }
            ParamKind::Spectrum => {
                let rgb = self.parse_spectrum_value()?;
                (ParamKind::Rgb, ParamValue::Rgbs(vec![rgb]))
            }
            ParamKind::Blackbody => {
                let vals = self.parse_value_floats()?;
                if vals.len() != 2 {
                    return Err(
                        self.syntax_error("'blackbody' expects a temperature and a scale value.")
                    );
                }
                let rgb = blackbody_to_rgb(vals[0], vals[1]);
                (ParamKind::Rgb, ParamValue::Rgbs(vec![rgb]))
            }
        };

        Ok(Param { kind, name, value })
    }

    fn parse_compound_floats(&mut self) -> Result<Vec<Float>> {
        let vals = self.parse_value_floats()?;
        if vals.len() % 3 != 0 {
            return Err(self.syntax_error("Wrong number of values given."));
        }
        Ok(vals)
    }

    /// A spectrum value: either a file of wavelength/value pairs or inline
    /// samples, converted to a single rgb triple.
    fn parse_spectrum_value(&mut self) -> Result<Vector3f> {
        match self.parse_value_mixed()? {
            ArrayVals::Str(files) => {
                if files.len() > 1 {
                    return Err(self.syntax_error("Expected only one value."));
                }

                let fname = concatenate_paths(
                    &self.lexers.current_path(),
                    &standardize_path_separator(&files[0]),
                );
                let values = read_float_file(&fname).map_err(|e| {
                    self.syntax_error(&format!("Unable to read spectrum file: {:#}", e))
                })?;

                if values.len() % 2 != 0 {
                    return Err(
                        self.syntax_error("Expected an even number of spectrum samples.")
                    );
                }

                let samples: Vec<(Float, Float)> =
                    values.chunks(2).map(|c| (c[0], c[1])).collect();
                Ok(spectrum_to_rgb(&samples))
            }
            ArrayVals::Num(values) => {
                if values.len() % 2 != 0 {
                    return Err(
                        self.syntax_error("Expected an even number of spectrum samples.")
                    );
                }

                let samples: Vec<(Float, Float)> =
                    values.chunks(2).map(|c| (c[0], c[1])).collect();
                Ok(spectrum_to_rgb(&samples))
            }
        }
    }

    /// Collect the parameters of the current directive, stopping at the next
    /// directive identifier.
    fn parse_params(&mut self) -> Result<ParamSet> {
        let mut params = ParamSet::default();

        while self.current.kind != LexemeType::Identifier {
            params.push(self.parse_parameter()?);
        }

        Ok(params)
    }

    // ------------------------------------------------------------------
    // transformations
    // ------------------------------------------------------------------

    fn execute_translate(&mut self) -> Result<()> {
        self.advance()?;
        let x = self.parse_directive_float("Translate", "x")?;
        let y = self.parse_directive_float("Translate", "y")?;
        let z = self.parse_directive_float("Translate", "z")?;

        self.gstate.ctm *= transform::translation(&Vector3f::new(x, y, z));
        Ok(())
    }

    fn execute_scale(&mut self) -> Result<()> {
        self.advance()?;
        let x = self.parse_directive_float("Scale", "x")?;
        let y = self.parse_directive_float("Scale", "y")?;
        let z = self.parse_directive_float("Scale", "z")?;

        self.gstate.ctm *= transform::scaling(x, y, z);
        Ok(())
    }

    fn execute_rotate(&mut self) -> Result<()> {
        self.advance()?;
        let angle = self.parse_directive_float("Rotate", "angle")?;
        let x = self.parse_directive_float("Rotate", "x")?;
        let y = self.parse_directive_float("Rotate", "y")?;
        let z = self.parse_directive_float("Rotate", "z")?;

        self.gstate.ctm *= transform::rotation(radians(angle), &Vector3f::new(x, y, z));
        Ok(())
    }

    fn execute_lookat(&mut self) -> Result<()> {
        self.advance()?;
        let ex = self.parse_directive_float("LookAt", "eye_x")?;
        let ey = self.parse_directive_float("LookAt", "eye_y")?;
        let ez = self.parse_directive_float("LookAt", "eye_z")?;
        let lx = self.parse_directive_float("LookAt", "look_x")?;
        let ly = self.parse_directive_float("LookAt", "look_y")?;
        let lz = self.parse_directive_float("LookAt", "look_z")?;
        let ux = self.parse_directive_float("LookAt", "up_x")?;
        let uy = self.parse_directive_float("LookAt", "up_y")?;
        let uz = self.parse_directive_float("LookAt", "up_z")?;

        let eye = Point3f::new(ex, ey, ez);
        let focus = Point3f::new(lx, ly, lz);
        let up = Vector3f::new(ux, uy, uz);

        let frame = transform::look_at(&eye, &focus, &up);
        let inverse = frame
            .try_inverse()
            .ok_or_else(|| self.syntax_error("Degenerate LookAt directive."))?;

        self.default_focus = (eye - focus).length();
        self.gstate.ctm *= inverse;
        Ok(())
    }

    fn parse_matrix16(&mut self) -> Result<Matrix4<Float>> {
        let vals = self.parse_value_floats()?;
        if vals.len() != 16 {
            return Err(self.syntax_error("Wrong number of values given. Expected a 4x4 matrix."));
        }

        Ok(Matrix4::from_row_slice(&vals))
    }

    fn execute_transform(&mut self) -> Result<()> {
        self.advance()?;
        self.gstate.ctm = self.parse_matrix16()?;
        Ok(())
    }

    fn execute_concat_transform(&mut self) -> Result<()> {
        self.advance()?;
        let m = self.parse_matrix16()?;
        self.gstate.ctm *= m;
        Ok(())
    }

    // ------------------------------------------------------------------
    // include
    // ------------------------------------------------------------------

    fn execute_include(&mut self) -> Result<()> {
        self.advance()?;
        if self.current.kind != LexemeType::String {
            return Err(self.syntax_error("Expected the name of the file to be included."));
        }

        let filename = std::mem::take(&mut self.current.value);
        if filename.is_empty() {
            return Err(self.syntax_error("Empty filename."));
        }

        let resolved = concatenate_paths(
            &self.lexers.current_path(),
            &standardize_path_separator(&filename),
        );
        let lexer = Lexer::from_file(&resolved)?;
        self.lexers.push(lexer);

        // first token of the included file; the including lexer resumes
        // past the filename when this one ends
        self.advance()
    }

    // ------------------------------------------------------------------
    // scene-wide rendering options
    // ------------------------------------------------------------------

    fn execute_camera(&mut self) -> Result<()> {
        self.advance()?;
        let subtype = self.expect_string("type string")?;

        if subtype != "perspective" {
            return Err(self.syntax_error("Only perspective camera type supported."));
        }

        let params = self.parse_params()?;

        // the current transformation defines world-to-camera; the frame is
        // its inverse with the forward axis negated
        let mut frame = self
            .gstate
            .ctm
            .try_inverse()
            .ok_or_else(|| self.syntax_error("The current transformation is not invertible."))?;
        frame[(0, 2)] = -frame[(0, 2)];
        frame[(1, 2)] = -frame[(1, 2)];
        frame[(2, 2)] = -frame[(2, 2)];

        let mut cam = Camera {
            name: format!("c{}", self.scene.cameras.len()),
            frame,
            yfov: radians(90.0),
            aspect: self.default_aspect,
            aperture: 0.0,
            focus: self.default_focus,
        };

        for p in params.iter() {
            match (p.name.as_str(), &p.value) {
                ("frameaspectratio", ParamValue::Floats(v)) => cam.aspect = v[0],
                ("fov", ParamValue::Floats(v)) => cam.yfov = radians(v[0]),
                ("lensradius", ParamValue::Floats(v)) => cam.aperture = v[0],
                ("focaldistance", ParamValue::Floats(v)) => cam.focus = v[0],
                _ => warn!("Ignoring Camera parameter \"{}\"", p.name),
            }
        }

        self.scene.cameras.push(cam);
        Ok(())
    }

    fn execute_film(&mut self) -> Result<()> {
        self.advance()?;
        let subtype = self.expect_string("type string")?;

        if subtype != "image" {
            return Err(self.syntax_error("Only image \"film\" is supported."));
        }

        let params = self.parse_params()?;
        let xres = params.find_one_int("xresolution", 0);
        let yres = params.find_one_int("yresolution", 0);

        for p in params.iter() {
            if p.name != "xresolution" && p.name != "yresolution" {
                warn!("Ignoring Film parameter \"{}\"", p.name);
            }
        }

        if xres != 0 && yres != 0 {
            self.default_aspect = (xres as Float / yres as Float).max(1.0);

            for cam in self.scene.cameras.iter_mut() {
                cam.aspect = self.default_aspect;
            }
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // blocks
    // ------------------------------------------------------------------

    fn execute_attribute_begin(&mut self) -> Result<()> {
        self.advance()?;
        self.state_stack.push(self.gstate.clone());
        Ok(())
    }

    fn execute_attribute_end(&mut self) -> Result<()> {
        self.advance()?;
        match self.state_stack.pop() {
            Some(state) => {
                self.gstate = state;
                Ok(())
            }
            None => {
                Err(self.syntax_error("AttributeEnd instruction unmatched with AttributeBegin."))
            }
        }
    }

    fn execute_transform_begin(&mut self) -> Result<()> {
        self.advance()?;
        self.ctm_stack.push(self.gstate.ctm);
        Ok(())
    }

    fn execute_transform_end(&mut self) -> Result<()> {
        self.advance()?;
        match self.ctm_stack.pop() {
            Some(ctm) => {
                self.gstate.ctm = ctm;
                Ok(())
            }
            None => Err(self.syntax_error("TransformEnd instruction unmatched with TransformBegin.")),
        }
    }

    // ------------------------------------------------------------------
    // shapes
    // ------------------------------------------------------------------

    fn execute_shape(&mut self) -> Result<()> {
        self.advance()?;
        let subtype = self.expect_string("shape name")?;

        let mut shp = Shape::default();

        match subtype.as_str() {
            "trianglemesh" => {
                let params = self.parse_params()?;
                self.build_trianglemesh(&params, &mut shp)?;
            }
            "plymesh" => {
                let params = self.parse_params()?;
                let filename = params
                    .find_one_string("filename")
                    .ok_or_else(|| self.syntax_error("Expected ply file path."))?;
                let resolved = concatenate_paths(
                    &self.lexers.current_path(),
                    &standardize_path_separator(filename),
                );

                load_plymesh(&resolved, &mut shp).map_err(|e| {
                    self.syntax_error(&format!("Error parsing ply file \"{}\": {:#}", resolved, e))
                })?;
            }
            "cube" => {
                let params = self.parse_params()?;
                for p in params.iter() {
                    warn!("Ignoring cube parameter \"{}\"", p.name);
                }
                make_cube(&mut shp);
            }
            "curve" => {
                // parsed for validation, then dropped
                self.parse_params()?;
                warn!("Curves are not supported; ignoring shape");
                return Ok(());
            }
            other => {
                warn!("Ignoring shape \"{}\"", other);
                return self.skip_to_next_directive();
            }
        }

        shp.name = self.ids.fresh(CounterId::Shape);
        shp.material = Some(self.material_for_shape());

        let (us, vs) = self.gstate.uv_scale;
        if us != 1.0 || vs != 1.0 {
            for t in shp.texcoord.iter_mut() {
                t.x *= us;
                t.y *= vs;
            }
        }

        match &mut self.in_object {
            Some(group) => group.shapes.push(shp),
            None => {
                let group = Arc::new(ShapeGroup {
                    name: self.ids.fresh(CounterId::ShapeGroup),
                    shapes: vec![shp],
                });

                self.scene.shapes.push(group.clone());
                self.scene.instances.push(Instance {
                    name: self.ids.fresh(CounterId::Instance),
                    shape_group: group,
                    frame: self.gstate.ctm,
                });
            }
        }

        Ok(())
    }

    /// The material a new shape attaches: the current one (committed on
    /// first use), an emissive copy of it while area-light mode is active,
    /// or a fresh empty material when none is set.
    fn material_for_shape(&mut self) -> Arc<Material> {
        if self.gstate.area_light.active {
            let mut mat = match &self.gstate.material {
                Some(decl) => (*decl.material).clone(),
                None => Material::default(),
            };

            mat.name = self.ids.fresh(CounterId::Material);
            mat.ke = self.gstate.area_light.l;
            mat.double_sided = self.gstate.area_light.twosided;

            let mat = Arc::new(mat);
            self.scene.materials.push(mat.clone());
            return mat;
        }

        match &self.gstate.material {
            Some(decl) => {
                decl.commit(&mut self.scene);
                decl.material.clone()
            }
            None => {
                info!("Empty material created");
                let mat = Arc::new(Material {
                    name: self.ids.fresh(CounterId::Material),
                    ..Default::default()
                });
                self.scene.materials.push(mat.clone());
                mat
            }
        }
    }

    fn build_trianglemesh(&self, params: &ParamSet, shp: &mut Shape) -> Result<()> {
        let mut indices: Option<&Vec<i32>> = None;
        let mut pos: Option<&Vec<Point3f>> = None;
        let mut norm: &[Normal3f] = &[];
        let mut uv: &[Float] = &[];

        for p in params.iter() {
            match (p.name.as_str(), &p.value) {
                ("indices", ParamValue::Ints(v)) => {
                    if v.len() % 3 != 0 {
                        return Err(self.syntax_error(
                            "The number of triangle vertices must be multiple of 3.",
                        ));
                    }
                    indices = Some(v);
                }
                ("P", ParamValue::Points(v)) => pos = Some(v),
                ("N", ParamValue::Normals(v)) => norm = v,
                ("uv", ParamValue::Floats(v)) | ("st", ParamValue::Floats(v)) => {
                    if v.len() % 2 != 0 {
                        return Err(self.syntax_error("'uv' parameter must contain u,v pairs."));
                    }
                    uv = v;
                }
                _ => warn!("Ignoring trianglemesh parameter \"{}\"", p.name),
            }
        }

        let (indices, pos) = match (indices, pos) {
            (Some(i), Some(p)) => (i, p),
            _ => {
                return Err(self.syntax_error(
                    "Missing indices or positions in triangle mesh specification.",
                ))
            }
        };

        fill_trianglemesh(shp, indices, pos, norm, uv);
        Ok(())
    }

    // ------------------------------------------------------------------
    // object definitions and instances
    // ------------------------------------------------------------------

    fn execute_object_block(&mut self) -> Result<()> {
        if self.in_object.is_some() {
            return Err(self.syntax_error("Cannot define an object inside another object."));
        }

        // attribute push so transformations inside the block do not leak
        self.execute_attribute_begin()?;
        self.in_object = Some(ShapeGroup {
            name: self.ids.fresh(CounterId::ShapeGroup),
            shapes: Vec::new(),
        });

        let obj_name = self.expect_string("object name as a string")?;
        let (_, start_line, _) = self.lexers.position();

        while !self.current.is_identifier("ObjectEnd") {
            self.execute_world_directive()?;
        }

        let group = match self.in_object.take() {
            Some(group) => group,
            None => return Err(self.syntax_error("Object definition lost.")),
        };

        let decl = DeclaredObject {
            groups: vec![Arc::new(group)],
            ctm: self.gstate.ctm,
            committed: false,
        };

        // an uncommitted previous declaration under the same name is dropped
        if self.objects.insert(obj_name, decl).is_some() {
            info!(
                "Object defined at line {} overrides an existent one",
                start_line
            );
        }

        self.execute_attribute_end()
    }

    fn execute_object_instance(&mut self) -> Result<()> {
        self.advance()?;
        let obj_name = self.expect_string("object name as a string")?;

        let frame;
        let groups;
        {
            let decl = match self.objects.get_mut(&obj_name) {
                Some(decl) => decl,
                None => return Err(self.syntax_error("Object name not found.")),
            };

            if decl.groups.iter().all(|g| g.shapes.is_empty()) {
                return Ok(());
            }

            // instance frame composes the current matrix with the one
            // captured at definition time
            frame = self.gstate.ctm * decl.ctm;

            if !decl.committed {
                decl.committed = true;
                for group in decl.groups.iter() {
                    self.scene.shapes.push(group.clone());
                }
            }

            groups = decl.groups.clone();
        }

        for group in groups {
            self.scene.instances.push(Instance {
                name: self.ids.fresh(CounterId::Instance),
                shape_group: group,
                frame,
            });
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // lights
    // ------------------------------------------------------------------

    fn execute_light_source(&mut self) -> Result<()> {
        self.advance()?;
        let subtype = self.expect_string("lightsource type as a string")?;

        match subtype.as_str() {
            "point" => self.parse_point_light(),
            // distant lights are treated as infinite
            "infinite" | "distant" => self.parse_infinite_light(),
            other => Err(self.syntax_error(&format!("Light type {} not supported.", other))),
        }
    }

    fn parse_point_light(&mut self) -> Result<()> {
        let params = self.parse_params()?;

        let scale = params.find_one_rgb("scale", Vector3f::splat(1.0));
        let intensity = params.find_one_rgb("I", Vector3f::splat(1.0));
        let from = params.find_one_point3("from", Point3f::default());

        // a point light is a one-point shape with an emissive material
        let mat = Arc::new(Material {
            name: self.ids.fresh(CounterId::Material),
            ke: intensity * scale,
            ..Default::default()
        });
        self.scene.materials.push(mat.clone());

        let shp = Shape {
            name: self.ids.fresh(CounterId::Shape),
            material: Some(mat),
            pos: vec![from],
            points: vec![0],
            radius: vec![1.0],
            ..Default::default()
        };

        let group = Arc::new(ShapeGroup {
            name: self.ids.fresh(CounterId::ShapeGroup),
            shapes: vec![shp],
        });

        self.scene.shapes.push(group.clone());
        self.scene.instances.push(Instance {
            name: self.ids.fresh(CounterId::Instance),
            shape_group: group,
            frame: self.gstate.ctm,
        });

        Ok(())
    }

    fn parse_infinite_light(&mut self) -> Result<()> {
        let params = self.parse_params()?;

        let scale = params.find_one_rgb("scale", Vector3f::splat(1.0));
        let l = params.find_one_rgb("L", Vector3f::splat(1.0));

        let mut env = Environment {
            name: self.ids.fresh(CounterId::Environment),
            ke: scale * l,
            ke_txt: None,
        };

        if let Some(mapname) = params.find_one_string("mapname") {
            let resolved = concatenate_paths(
                &self.lexers.current_path(),
                &standardize_path_separator(mapname),
            );

            let mut txt = if has_extension(&resolved, "png") {
                let img = load_image4b(&resolved).map_err(|e| {
                    self.syntax_error(&format!("Unable to load environment map: {:#}", e))
                })?;
                Texture::from_ldr(img)
            } else if has_extension(&resolved, "exr") {
                let img = load_image4f(&resolved).map_err(|e| {
                    self.syntax_error(&format!("Unable to load environment map: {:#}", e))
                })?;
                Texture::from_hdr(img)
            } else {
                return Err(self.syntax_error("Texture format not recognized."));
            };

            txt.name = self.ids.fresh(CounterId::Texture);
            txt.path = resolved;

            let txt = Arc::new(txt);
            self.scene.textures.push(txt.clone());
            env.ke_txt = Some(txt);
        }

        self.scene.environments.push(env);
        Ok(())
    }

    fn execute_area_light_source(&mut self) -> Result<()> {
        self.advance()?;
        // the subtype is accepted without further validation
        let _subtype = self.expect_string("lightsource type as a string")?;

        let params = self.parse_params()?;

        let scale = params.find_one_rgb("scale", Vector3f::splat(1.0));
        let l = params.find_one_rgb("L", Vector3f::splat(1.0));
        let twosided = params.find_one_bool("twosided", false);

        self.gstate.area_light = AreaLightInfo {
            active: true,
            l: l * scale,
            twosided,
        };

        Ok(())
    }

    // ------------------------------------------------------------------
    // materials
    // ------------------------------------------------------------------

    /// Interpret the parameters every material subtype may declare. Texture
    /// references resolve against the graphics-state table, commit the
    /// referenced texture to the scene and propagate its uv-scale.
    fn parse_material_props(&mut self, params: &ParamSet) -> Result<MaterialProps> {
        let mut props = MaterialProps::default();

        for p in params.iter() {
            match p.name.as_str() {
                "type" => match &p.value {
                    ParamValue::Strings(v) => props.type_name = Some(v[0].clone()),
                    _ => return Err(self.syntax_error("Parameter 'type' expects a string type.")),
                },
                "Kd" => props.kd = Some(self.color_prop(p)?),
                "Ks" => props.ks = Some(self.color_prop(p)?),
                "Kr" | "reflect" => props.kr = Some(self.color_prop(p)?),
                "Kt" | "transmit" => props.kt = Some(self.color_prop(p)?),
                "eta" => props.eta = Some(self.color_prop(p)?),
                "k" => props.k = Some(self.color_prop(p)?),
                "roughness" => match &p.value {
                    ParamValue::Floats(v) => {
                        props.rs = Some(ScalarProp {
                            value: v[0],
                            texture: None,
                        })
                    }
                    ParamValue::Texture(name) => {
                        let decl = self.lookup_texture(name, "roughness")?;
                        props.rs = Some(ScalarProp {
                            value: 1.0,
                            texture: Some(decl.texture.clone()),
                        });
                    }
                    _ => {
                        return Err(self.syntax_error(
                            "'roughness' parameter must be a float or a texture.",
                        ))
                    }
                },
                "amount" => match &p.value {
                    ParamValue::Floats(v) => props.amount = Some(v[0]),
                    ParamValue::Rgbs(v) => props.amount = Some(amount_from_rgb(v[0])),
                    _ => {
                        return Err(self
                            .syntax_error("'amount' parameter expects a 'float' or 'rgb' type."))
                    }
                },
                "namedmaterial1" => match &p.value {
                    ParamValue::Strings(v) => props.named_material1 = Some(v[0].clone()),
                    _ => {
                        return Err(
                            self.syntax_error("'namedmaterial1' expects a 'string' type.")
                        )
                    }
                },
                "namedmaterial2" => match &p.value {
                    ParamValue::Strings(v) => props.named_material2 = Some(v[0].clone()),
                    _ => {
                        return Err(
                            self.syntax_error("'namedmaterial2' expects a 'string' type.")
                        )
                    }
                },
                "bump" | "bumpmap" => match &p.value {
                    ParamValue::Texture(name) => {
                        let decl = self.lookup_texture(name, &p.name)?;
                        props.bump = Some(decl.texture.clone());
                    }
                    _ => return Err(self.syntax_error("'bumpmap' expects a 'texture' type.")),
                },
                other => warn!("Material property \"{}\" ignored", other),
            }
        }

        Ok(props)
    }

    /// An rgb-or-texture material parameter. A texture reference yields the
    /// value (1,1,1) with the texture attached.
    fn color_prop(&mut self, p: &Param) -> Result<ColorProp> {
        match &p.value {
            ParamValue::Rgbs(v) => Ok(ColorProp {
                value: v[0],
                texture: None,
            }),
            ParamValue::Texture(name) => {
                let decl = self.lookup_texture(name, &p.name)?;
                Ok(ColorProp {
                    value: Vector3f::splat(1.0),
                    texture: Some(decl.texture.clone()),
                })
            }
            _ => Err(self.syntax_error(&format!(
                "'{}' parameter must be a spectrum, rgb or a texture.",
                p.name
            ))),
        }
    }

    /// Resolve a declared texture by name, committing it to the scene (it is
    /// now referenced by a material) and propagating its uv-scale into the
    /// graphics state.
    fn lookup_texture(&mut self, name: &str, param: &str) -> Result<Arc<DeclaredTexture>> {
        let decl = match self.gstate.textures.get(name) {
            Some(decl) => decl.clone(),
            None => {
                return Err(self.syntax_error(&format!(
                    "The specified texture for parameter '{}' was not found.",
                    param
                )))
            }
        };

        decl.commit(&mut self.scene);
        self.gstate.uv_scale = (decl.uscale, decl.vscale);
        Ok(decl)
    }

    fn make_material(&mut self, subtype: &str, props: &MaterialProps) -> Result<Material> {
        let mut mat = match subtype {
            "matte" => create_matte_material(props),
            "plastic" => create_plastic_material(props),
            "metal" => create_metal_material(props),
            "mirror" => create_mirror_material(props),
            "uber" => create_uber_material(props),
            "translucent" => create_translucent_material(props),
            "glass" => create_glass_material(props),
            "mix" => {
                let n1 = props
                    .named_material1
                    .as_ref()
                    .ok_or_else(|| self.syntax_error("Missing material1 to mix."))?;
                let n2 = props
                    .named_material2
                    .as_ref()
                    .ok_or_else(|| self.syntax_error("Missing material2 to mix."))?;

                let m1 = match self.gstate.materials.get(n1) {
                    Some(m) => m.clone(),
                    None => {
                        return Err(self.syntax_error(&format!(
                            "NamedMaterial1 \"{}\" was not declared.",
                            n1
                        )))
                    }
                };
                let m2 = match self.gstate.materials.get(n2) {
                    Some(m) => m.clone(),
                    None => {
                        return Err(self.syntax_error(&format!(
                            "NamedMaterial2 \"{}\" was not declared.",
                            n2
                        )))
                    }
                };

                create_mix_material(
                    props,
                    &m1.material,
                    &m2.material,
                    &mut self.scene,
                    &mut self.ids,
                )
            }
            _ => return Err(self.syntax_error("Material type not supported.")),
        };

        mat.name = self.ids.fresh(CounterId::Material);
        Ok(mat)
    }

    fn execute_material(&mut self) -> Result<()> {
        self.advance()?;
        let subtype = self.expect_string("material type as a string")?;

        let params = self.parse_params()?;
        let props = self.parse_material_props(&params)?;

        let subtype = if MATERIAL_SUBTYPES.contains(&subtype.as_str()) {
            subtype
        } else {
            warn!("Material \"{}\" not supported. Using \"matte\"", subtype);
            "matte".to_owned()
        };

        let mat = self.make_material(&subtype, &props)?;
        self.gstate.material = Some(Arc::new(DeclaredMaterial::new(Arc::new(mat))));
        Ok(())
    }

    fn execute_make_named_material(&mut self) -> Result<()> {
        self.advance()?;
        let name = self.expect_string("material name as string")?;

        if self.gstate.materials.contains_key(&name) {
            return Err(self.syntax_error("A material with the specified name already exists."));
        }

        let params = self.parse_params()?;
        let props = self.parse_material_props(&params)?;

        let subtype = props
            .type_name
            .clone()
            .ok_or_else(|| self.syntax_error("Expected material type."))?;

        if !MATERIAL_SUBTYPES.contains(&subtype.as_str()) {
            return Err(self.syntax_error(&format!(
                "Material type {} not supported or recognized.",
                subtype
            )));
        }

        let mat = self.make_material(&subtype, &props)?;
        self.gstate
            .materials
            .insert(name, Arc::new(DeclaredMaterial::new(Arc::new(mat))));
        Ok(())
    }

    fn execute_named_material(&mut self) -> Result<()> {
        self.advance()?;
        let name = self.expect_string("material name string")?;

        match self.gstate.materials.get(&name) {
            Some(decl) => {
                self.gstate.material = Some(decl.clone());
                Ok(())
            }
            None => Err(self.syntax_error("No material with the specified name.")),
        }
    }

    // ------------------------------------------------------------------
    // textures
    // ------------------------------------------------------------------

    fn execute_texture(&mut self) -> Result<()> {
        self.advance()?;
        let name = self.expect_string("texture name string")?;

        if self.gstate.textures.contains_key(&name) {
            return Err(self.syntax_error("Texture name already used."));
        }

        let pixeltype = self.expect_string("texture type string")?;
        let pixeltype = if pixeltype == "color" { "rgb".to_owned() } else { pixeltype };

        if pixeltype != "spectrum" && pixeltype != "rgb" && pixeltype != "float" {
            return Err(
                self.syntax_error(&format!("Unsupported texture base type: {}.", pixeltype))
            );
        }

        let class = self.expect_string("texture class string")?;
        let params = self.parse_params()?;

        let mut uscale = 1.0;
        let mut vscale = 1.0;

        let mut txt = match class.as_str() {
            "imagemap" => {
                let filename = params
                    .find_one_string("filename")
                    .ok_or_else(|| self.syntax_error("No texture filename provided."))?;
                let resolved = concatenate_paths(
                    &self.lexers.current_path(),
                    &standardize_path_separator(filename),
                );

                uscale = params.find_one_float("uscale", 1.0).max(1.0);
                vscale = params.find_one_float("vscale", 1.0).max(1.0);

                create_imagemap_texture(&resolved).map_err(|e| {
                    self.syntax_error(&format!("Unable to load texture: {:#}", e))
                })?
            }
            "constant" => {
                let value = self.color_or_float(&params, "value", Vector3f::splat(1.0))?;
                create_constant_texture(value)
            }
            "checkerboard" => {
                let tex1 = self.color_or_float(&params, "tex1", Vector3f::default())?;
                let tex2 = self.color_or_float(&params, "tex2", Vector3f::splat(1.0))?;

                uscale = params.find_one_float("uscale", 1.0);
                vscale = params.find_one_float("vscale", 1.0);
                if uscale < 0.0 {
                    uscale = 1.0;
                }
                if vscale < 0.0 {
                    vscale = 1.0;
                }

                create_checkerboard_texture(tex1, tex2)
            }
            "scale" => {
                let tex1 = self.scale_input(&params, "tex1")?;
                let tex2 = self.scale_input(&params, "tex2")?;
                create_scale_texture(tex1, tex2)
            }
            other => {
                return Err(self.syntax_error(&format!("Texture class not supported: {}.", other)))
            }
        };

        txt.name = self.ids.fresh(CounterId::Texture);
        if txt.path.is_empty() {
            txt.path = format!("{}.png", txt.name);
        }

        self.gstate.textures.insert(
            name,
            Arc::new(DeclaredTexture::new(Arc::new(txt), uscale, vscale)),
        );
        Ok(())
    }

    /// A float-or-rgb texture parameter; floats become gray triples.
    fn color_or_float(&self, params: &ParamSet, name: &str, d: Vector3f) -> Result<Vector3f> {
        match params.find(name).map(|p| &p.value) {
            None => Ok(d),
            Some(ParamValue::Floats(v)) => Ok(Vector3f::splat(v[0])),
            Some(ParamValue::Rgbs(v)) => Ok(v[0]),
            Some(_) => Err(self.syntax_error(&format!(
                "'{}' parameter must have float/spectrum type.",
                name
            ))),
        }
    }

    /// An operand of the "scale" texture class: a declared texture reference
    /// or a float/rgb constant. A scale texture does not commit its
    /// operands; only materials and lights do.
    fn scale_input(&self, params: &ParamSet, name: &str) -> Result<ScaleInput> {
        match params.find(name).map(|p| &p.value) {
            None => Ok(ScaleInput::Constant(Vector3f::splat(1.0))),
            Some(ParamValue::Texture(tex_name)) => match self.gstate.textures.get(tex_name) {
                Some(decl) => Ok(ScaleInput::Texture(decl.texture.clone())),
                None => Err(self.syntax_error(&format!(
                    "The specified texture for parameter '{}' was not found.",
                    name
                ))),
            },
            Some(ParamValue::Floats(v)) => Ok(ScaleInput::Constant(Vector3f::splat(v[0]))),
            Some(ParamValue::Rgbs(v)) => Ok(ScaleInput::Constant(v[0])),
            Some(_) => Err(self.syntax_error(&format!(
                "'{}' parameter must be a texture, float or rgb.",
                name
            ))),
        }
    }
}
