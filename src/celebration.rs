use rand::{seq::SliceRandom, Rng};

/// Ticks the burst stays on screen (about 3 seconds at the default tick rate)
const CELEBRATION_TICKS: u32 = 30;
const SPARK_COUNT: usize = 40;
const GRAVITY: f64 = 12.0;
const DT: f64 = 0.1;

const SPARK_SYMBOLS: [char; 6] = ['×', '★', '✓', '+', '=', '•'];
const HEADLINES: [&str; 5] = [
    "YOU DID IT!",
    "GREAT JOB!",
    "SUPERSTAR!",
    "MATH WIZARD!",
    "WELL DONE!",
];

#[derive(Debug, Clone)]
pub struct Spark {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
}

impl Spark {
    fn launch<R: Rng + ?Sized>(rng: &mut R, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-6.0..6.0),
            vel_y: rng.gen_range(-8.0..-2.0),
            symbol: *SPARK_SYMBOLS.choose(rng).unwrap_or(&'★'),
            color_index: rng.gen_range(0..6),
        }
    }

    fn update(&mut self) {
        self.x += self.vel_x * DT;
        self.y += self.vel_y * DT;
        self.vel_y += GRAVITY * DT;
    }
}

/// Firework burst shown when a game is won
#[derive(Debug, Default)]
pub struct Celebration {
    pub sparks: Vec<Spark>,
    pub headline: &'static str,
    ticks_left: u32,
    width: f64,
    height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start<R: Rng + ?Sized>(&mut self, width: u16, height: u16, rng: &mut R) {
        self.width = width as f64;
        self.height = height as f64;
        self.ticks_left = CELEBRATION_TICKS;
        self.headline = HEADLINES.choose(rng).copied().unwrap_or("WELL DONE!");

        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        self.sparks = (0..SPARK_COUNT)
            .map(|_| Spark::launch(rng, cx, cy))
            .collect();
    }

    pub fn is_active(&self) -> bool {
        self.ticks_left > 0
    }

    pub fn stop(&mut self) {
        self.ticks_left = 0;
        self.sparks.clear();
    }

    pub fn update(&mut self) {
        if !self.is_active() {
            return;
        }

        self.ticks_left -= 1;
        if self.ticks_left == 0 {
            self.sparks.clear();
            return;
        }

        let (w, h) = (self.width, self.height);
        self.sparks.retain_mut(|spark| {
            spark.update();
            spark.x >= 0.0 && spark.x < w && spark.y < h
        });
    }
}
