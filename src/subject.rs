use zoomies::Position;

const WALK_SPEED: f32 = 6.0;
const SPRINT_SPEED: f32 = 12.0;
const JUMP_VELOCITY: f32 = 8.0;
const GRAVITY: f32 = 20.0;

#[derive(Debug, Default, Clone, Copy)]
pub struct MoveInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    pub jump: bool,
}

impl MoveInput {
    pub fn read(ctx: &egui::Context) -> Self {
        use egui::Key;

        ctx.input(|i| Self {
            forward: i.key_down(Key::W) || i.key_down(Key::ArrowUp),
            back: i.key_down(Key::S) || i.key_down(Key::ArrowDown),
            left: i.key_down(Key::A) || i.key_down(Key::ArrowLeft),
            right: i.key_down(Key::D) || i.key_down(Key::ArrowRight),
            sprint: i.modifiers.shift,
            jump: i.key_pressed(Key::Space),
        })
    }
}

/// Stand-in for a game character: walks on the X/Z plane and jumps along Y.
#[derive(Debug, Clone)]
pub struct DemoSubject {
    position: Position,
    vertical_velocity: f32,
    pub present: bool,
}

impl DemoSubject {
    pub fn new() -> Self {
        Self {
            position: Position::new(0.0, 0.0, 0.0),
            vertical_velocity: 0.0,
            present: true,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn step(&mut self, input: &MoveInput, delta_time: f32) {
        let mut dx = 0.0;
        let mut dz = 0.0;
        if input.forward { dz -= 1.0; }
        if input.back { dz += 1.0; }
        if input.left { dx -= 1.0; }
        if input.right { dx += 1.0; }

        let length = f32::sqrt(dx * dx + dz * dz);
        if length > 0.0 {
            let speed = if input.sprint { SPRINT_SPEED } else { WALK_SPEED };
            self.position.x += dx / length * speed * delta_time;
            self.position.z += dz / length * speed * delta_time;
        }

        let grounded = self.position.y <= 0.0;
        if input.jump && grounded {
            self.vertical_velocity = JUMP_VELOCITY;
        }
        self.vertical_velocity -= GRAVITY * delta_time;
        self.position.y += self.vertical_velocity * delta_time;
        if self.position.y <= 0.0 {
            self.position.y = 0.0;
            self.vertical_velocity = 0.0;
        }
    }
}
