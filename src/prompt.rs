use crate::models::{ProductInput, ProductType};

/// Headers every `fullPrompt` block must carry, in this order.
pub const SECTION_HEADERS: [&str; 7] = [
    "CHARACTER:",
    "LOOK:",
    "SCENE SETUP:",
    "CAMERA MOVEMENTS:",
    "ACTIONS:",
    "DIALOGUE",
    "ENDING:",
];

/// The four marketing angles, one prompt each, in response order.
pub const STRATEGIES: [(&str, &str); 4] = [
    ("Visual Impact", "Focus on the beauty/aesthetic of the product/location."),
    ("Pain/Benefit", "Focus on solving a problem quickly."),
    ("Urgency/Sale", "Focus on \"Last units\", \"Promotion\"."),
    ("Detailed Demo", "Focus on showing exactly how the product works or fits."),
];

pub const DEFAULT_OUTRO_HANDLE: &str = "@achadinhos_da_ellen";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guidance {
    pub look: String,
    pub actions: String,
}

/// Instruction and user turn for one completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system_instruction: String,
    pub user_message: String,
}

/// LOOK / ACTIONS guidance for the product type.
pub fn guidance_for(input: &ProductInput) -> Guidance {
    let name = input.product_name.trim();
    match input.product_type {
        ProductType::Fashion => Guidance {
            look: format!("The \"LOOK\" section must describe the '{name}' being WORN by the influencer. Describe the fit, fabric, and style in detail."),
            actions: "In \"ACTIONS\", she must model the outfit: turning, adjusting the fabric, showing details on her body. She should point to the \"link/cart\" gestures.".to_string(),
        },
        ProductType::PhysicalObject => Guidance {
            look: format!("The \"LOOK\" section should describe a trendy outfit that fits the vibe of '{}', but the product is held in her hands.", input.environment.trim()),
            actions: format!("In \"ACTIONS\", she holds the '{name}' up to the camera, demonstrates how it works, points to specific features, and does the \"link/cart\" gestures."),
        },
    }
}

pub fn price_guidance(input: &ProductInput) -> String {
    match input.disclosed_price() {
        Some(price) => format!("Include the price ({price}) naturally in the Portuguese dialogue."),
        None => "Do not mention a specific number. Use terms like \"preço de fábrica\", \"super oferta\", \"queima de estoque\".".to_string(),
    }
}

pub fn build_request(input: &ProductInput, outro_handle: &str) -> CompletionRequest {
    let Guidance { look, actions } = guidance_for(input);
    let price = price_guidance(input);
    let product = input.product_name.trim();
    let environment = input.environment.trim();
    let features = input.features.trim();
    let product_type = input.product_type;
    let target = input.target_model;

    let strategies = STRATEGIES
        .iter()
        .enumerate()
        .map(|(i, (name, focus))| format!("{}. **{name}:** {focus}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    let system_instruction = format!(
        r#"You are an elite Prompt Engineer for Veo3 and Sora2.

YOUR TASK:
Generate 4 distinct video generation prompts based on the product data.

INPUT DATA:
- Product: {product}
- Type: {product_type}
- Target Model: {target}
- Features: {features}
- Environment: {environment}
- Price Strategy: {price}

OUTPUT FORMAT RULES:
You must STRICTLY follow the structure below for every prompt. Do not change the headers.

TEMPLATE STRUCTURE (Fill in the brackets):

CHARACTER:
[Description of a stunning influencer suitable for the niche (e.g., blonde, brunette, curly hair). Describe physical traits, expression, and charisma.]

LOOK:
[{look} Describe accessories and general style.]

SCENE SETUP:
Location: {environment}.
Background: [Specific details of the background matching the location].
Lighting: [Lighting details, e.g., Golden Hour, Studio Bright, Neon].
Aspect ratio: 9:16 vertical, photorealistic 4K quality.

CAMERA MOVEMENTS:
[Cinematic instructions. Start with full shot or medium shot. Zoom details. Focus adjustments.]

ACTIONS:
[{actions} She acts confident, smiles, gestures numbers with hands, gives thumbs up, points down repeatedly for the cart.]

DIALOGUE (Portuguese): INFLUENCIADORA: "[Write a natural, high-energy script in PT-BR. She MUST mention the 'Carrinho Laranja' (Orange Cart). Keep it under 8 seconds spoken. {price}]"

ENDING:
She smiles broadly, [closing action].
After the main shot fades, a short animated outro appears featuring the TikTok logo in the lower right corner, followed by the glowing white text "{outro_handle}".
The animation lasts around 1.5 seconds, with a smooth fade-in and subtle pulse effect, matching the video's lighting.
Keep it elegant, cinematic, and professional.

--------------------------------------------------

STRATEGIES FOR THE 4 VARIATIONS:
{strategies}
"#
    );

    let user_message = format!(
        "Generate 4 structured prompts for {product} situated in {environment}. Follow the strict header format provided."
    );

    CompletionRequest { system_instruction, user_message }
}
