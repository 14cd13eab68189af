use jonark::{
    context::GraphicContextConfig,
    flow::{self, Demo},
};

struct ClearScreen;

impl Demo for ClearScreen {
    fn on_render(&self, _pass: &mut wgpu::RenderPass<'_>) {}
}

fn main() {
    let config = GraphicContextConfig {
        clear_colour: wgpu::Color {
            r: 0.2,
            g: 0.3,
            b: 0.3,
            a: 1.0,
        },
        depth: false,
        ..GraphicContextConfig::new("Clear Screen", 640, 480)
    };
    if let Err(e) = flow::run(config, |_ctx| async { Ok(ClearScreen) }) {
        eprintln!("clear_screen failed: {:#}", e);
        std::process::exit(1);
    }
}
