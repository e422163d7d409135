use nalgebra::{Matrix4, Point3, Vector3};
use wasm_bindgen::prelude::*;
use web_sys::{WebGlBuffer, WebGlProgram, WebGlRenderingContext, WebGlUniformLocation};

use crate::engine::mesh::Mesh;

const VERTEX_SHADER: &str = r#"
    attribute vec3 aPosition;
    attribute vec3 aNormal;
    uniform mat4 uMvp;
    uniform mat4 uModel;
    uniform float uPointSize;
    varying vec3 vNormal;
    varying vec3 vWorldPos;
    void main() {
        gl_Position = uMvp * vec4(aPosition, 1.0);
        gl_PointSize = uPointSize;
        vNormal = aNormal;
        vWorldPos = (uModel * vec4(aPosition, 1.0)).xyz;
    }
"#;

const FRAGMENT_SHADER: &str = r#"
    precision mediump float;
    varying vec3 vNormal;
    varying vec3 vWorldPos;
    uniform vec3 uColor;
    uniform vec3 uLightPos;
    uniform vec3 uLightColor;
    uniform vec3 uAmbientColor;
    uniform int uUnlit;

    void main() {
        if (uUnlit == 1) {
            gl_FragColor = vec4(uColor, 1.0);
            return;
        }
        vec3 n = normalize(vNormal);
        vec3 l = normalize(uLightPos - vWorldPos);
        float diffuse = max(dot(n, l), 0.0);
        vec3 color = uColor * (uAmbientColor + uLightColor * diffuse);
        gl_FragColor = vec4(color, 1.0);
    }
"#;

/// Point light plus ambient term, both theme-dependent.
pub struct LightRig {
    pub position: Point3<f32>,
    pub color: [f32; 3],
    pub ambient: [f32; 3],
}

pub struct Renderer {
    pub gl: WebGlRenderingContext,
    position_location: u32,
    normal_location: u32,
    mvp_location: WebGlUniformLocation,
    model_location: WebGlUniformLocation,
    point_size_location: WebGlUniformLocation,
    color_location: WebGlUniformLocation,
    light_pos_location: WebGlUniformLocation,
    light_color_location: WebGlUniformLocation,
    ambient_color_location: WebGlUniformLocation,
    unlit_location: WebGlUniformLocation,
    mesh_vertex_buffer: WebGlBuffer,
    mesh_index_buffer: WebGlBuffer,
    line_buffer: WebGlBuffer,
    star_buffer: WebGlBuffer,
    star_count: i32,
}

impl Renderer {
    pub fn new(gl: WebGlRenderingContext) -> Result<Self, JsValue> {
        let program = create_program(&gl)?;
        gl.use_program(Some(&program));

        let position_location = gl.get_attrib_location(&program, "aPosition") as u32;
        let normal_location = gl.get_attrib_location(&program, "aNormal") as u32;

        let uniform = |name: &str| -> Result<WebGlUniformLocation, JsValue> {
            gl.get_uniform_location(&program, name)
                .ok_or_else(|| JsValue::from_str(&format!("missing uniform {name}")))
        };
        let mvp_location = uniform("uMvp")?;
        let model_location = uniform("uModel")?;
        let point_size_location = uniform("uPointSize")?;
        let color_location = uniform("uColor")?;
        let light_pos_location = uniform("uLightPos")?;
        let light_color_location = uniform("uLightColor")?;
        let ambient_color_location = uniform("uAmbientColor")?;
        let unlit_location = uniform("uUnlit")?;

        let mesh_vertex_buffer = gl.create_buffer().ok_or("Failed to create buffer")?;
        let mesh_index_buffer = gl.create_buffer().ok_or("Failed to create buffer")?;
        let line_buffer = gl.create_buffer().ok_or("Failed to create buffer")?;
        let star_buffer = gl.create_buffer().ok_or("Failed to create buffer")?;

        gl.uniform1f(Some(&point_size_location), 1.0);

        Ok(Renderer {
            gl,
            position_location,
            normal_location,
            mvp_location,
            model_location,
            point_size_location,
            color_location,
            light_pos_location,
            light_color_location,
            ambient_color_location,
            unlit_location,
            mesh_vertex_buffer,
            mesh_index_buffer,
            line_buffer,
            star_buffer,
            star_count: 0,
        })
    }

    pub fn clear(&self, color: [f32; 3]) {
        self.gl.clear_color(color[0], color[1], color[2], 1.0);
        self.gl.clear(WebGlRenderingContext::COLOR_BUFFER_BIT | WebGlRenderingContext::DEPTH_BUFFER_BIT);
    }

    pub fn enable_depth_test(&self) {
        self.gl.enable(WebGlRenderingContext::DEPTH_TEST);
    }

    pub fn resize(&self, width: i32, height: i32) {
        self.gl.viewport(0, 0, width, height);
    }

    /// Upload the starfield once; positions never change after startup.
    pub fn load_stars(&mut self, vertices: &[f32]) {
        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.star_buffer));
        unsafe {
            let array = js_sys::Float32Array::view(vertices);
            self.gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &array,
                WebGlRenderingContext::STATIC_DRAW,
            );
        }
        self.star_count = (vertices.len() / 3) as i32;
    }

    pub fn draw_stars(&self, color: [f32; 3], size: f32, view_proj: &Matrix4<f32>) {
        if self.star_count == 0 {
            return;
        }
        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.star_buffer));
        self.bind_position_only_layout();
        self.set_unlit(color);
        self.gl.uniform1f(Some(&self.point_size_location), size);
        self.set_matrices(view_proj, &Matrix4::identity());

        self.gl.draw_arrays(WebGlRenderingContext::POINTS, 0, self.star_count);
    }

    pub fn draw_mesh(
        &self,
        mesh: &Mesh,
        position: &Point3<f32>,
        color: [f32; 3],
        light: Option<&LightRig>,
        view_proj: &Matrix4<f32>,
    ) {
        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.mesh_vertex_buffer));
        unsafe {
            let vert_array = js_sys::Float32Array::view(&mesh.vertices);
            self.gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &vert_array,
                WebGlRenderingContext::DYNAMIC_DRAW,
            );
        }
        self.gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&self.mesh_index_buffer));
        unsafe {
            let idx_array = js_sys::Uint16Array::view(&mesh.indices);
            self.gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ELEMENT_ARRAY_BUFFER,
                &idx_array,
                WebGlRenderingContext::DYNAMIC_DRAW,
            );
        }

        self.gl.vertex_attrib_pointer_with_i32(self.position_location, 3, WebGlRenderingContext::FLOAT, false, 24, 0);
        self.gl.enable_vertex_attrib_array(self.position_location);
        self.gl.vertex_attrib_pointer_with_i32(self.normal_location, 3, WebGlRenderingContext::FLOAT, false, 24, 12);
        self.gl.enable_vertex_attrib_array(self.normal_location);

        match light {
            Some(rig) => {
                self.gl.uniform1i(Some(&self.unlit_location), 0);
                self.gl.uniform3f(Some(&self.color_location), color[0], color[1], color[2]);
                self.gl.uniform3f(Some(&self.light_pos_location), rig.position.x, rig.position.y, rig.position.z);
                self.gl.uniform3f(Some(&self.light_color_location), rig.color[0], rig.color[1], rig.color[2]);
                self.gl.uniform3f(Some(&self.ambient_color_location), rig.ambient[0], rig.ambient[1], rig.ambient[2]);
            }
            None => self.set_unlit(color),
        }

        let model = Matrix4::new_translation(&Vector3::new(position.x, position.y, position.z));
        self.set_matrices(&(view_proj * model), &model);

        self.gl.draw_elements_with_i32(
            WebGlRenderingContext::TRIANGLES,
            mesh.indices.len() as i32,
            WebGlRenderingContext::UNSIGNED_SHORT,
            0,
        );
    }

    pub fn draw_line_loop(&self, vertices: &[f32], color: [f32; 3], view_proj: &Matrix4<f32>) {
        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.line_buffer));
        unsafe {
            let array = js_sys::Float32Array::view(vertices);
            self.gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &array,
                WebGlRenderingContext::DYNAMIC_DRAW,
            );
        }
        self.bind_position_only_layout();
        self.set_unlit(color);
        self.set_matrices(view_proj, &Matrix4::identity());

        self.gl.draw_arrays(WebGlRenderingContext::LINE_LOOP, 0, (vertices.len() / 3) as i32);
    }

    fn bind_position_only_layout(&self) {
        self.gl.vertex_attrib_pointer_with_i32(self.position_location, 3, WebGlRenderingContext::FLOAT, false, 0, 0);
        self.gl.enable_vertex_attrib_array(self.position_location);
        self.gl.disable_vertex_attrib_array(self.normal_location);
    }

    fn set_unlit(&self, color: [f32; 3]) {
        self.gl.uniform1i(Some(&self.unlit_location), 1);
        self.gl.uniform3f(Some(&self.color_location), color[0], color[1], color[2]);
    }

    fn set_matrices(&self, mvp: &Matrix4<f32>, model: &Matrix4<f32>) {
        let mvp_array: [f32; 16] = mvp.as_slice().try_into().unwrap();
        self.gl.uniform_matrix4fv_with_f32_array(Some(&self.mvp_location), false, &mvp_array);
        let model_array: [f32; 16] = model.as_slice().try_into().unwrap();
        self.gl.uniform_matrix4fv_with_f32_array(Some(&self.model_location), false, &model_array);
    }
}

fn create_program(gl: &WebGlRenderingContext) -> Result<WebGlProgram, JsValue> {
    let vert_shader = compile_shader(gl, WebGlRenderingContext::VERTEX_SHADER, VERTEX_SHADER)?;
    let frag_shader = compile_shader(gl, WebGlRenderingContext::FRAGMENT_SHADER, FRAGMENT_SHADER)?;

    let program = gl.create_program().ok_or("Unable to create program")?;
    gl.attach_shader(&program, &vert_shader);
    gl.attach_shader(&program, &frag_shader);
    gl.link_program(&program);

    if gl.get_program_parameter(&program, WebGlRenderingContext::LINK_STATUS).as_bool().unwrap_or(false) {
        Ok(program)
    } else {
        Err(JsValue::from_str(&gl.get_program_info_log(&program).unwrap_or_default()))
    }
}

fn compile_shader(gl: &WebGlRenderingContext, shader_type: u32, source: &str) -> Result<web_sys::WebGlShader, JsValue> {
    let shader = gl.create_shader(shader_type).ok_or("Unable to create shader")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl.get_shader_parameter(&shader, WebGlRenderingContext::COMPILE_STATUS).as_bool().unwrap_or(false) {
        Ok(shader)
    } else {
        Err(JsValue::from_str(&gl.get_shader_info_log(&shader).unwrap_or_default()))
    }
}
